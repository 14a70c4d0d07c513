use {
    crate::deployer::MinterConfirmation,
    alloy::signers::local::PrivateKeySigner,
    std::{path::PathBuf, time::Duration},
    tracing::Level,
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(
        long,
        env,
        default_value = "warn,deploy_contracts=debug,contracts=debug,ethrpc=debug"
    )]
    pub log_filter: String,

    /// Events at or above this level are written to stderr instead of stdout.
    /// Takes a level (`trace` to `error`), stderr cannot be switched off.
    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: Level,

    /// Emit log lines as JSON objects.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

impl LoggingArguments {
    pub fn observe_config(&self) -> observe::Config {
        observe::Config::new(
            &self.log_filter,
            Some(self.log_stderr_threshold),
            self.use_json_logs,
        )
    }
}

impl std::fmt::Display for LoggingArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

#[derive(clap::Parser)]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// The chain the contracts are expected to be deployed on. The connected
    /// node is checked against it before anything gets sent.
    #[clap(long, env)]
    pub chain_id: Option<u64>,

    /// Hex encoded private key of the account paying for the deployment.
    /// Without it the node's first unlocked account is used.
    #[clap(long, env)]
    pub private_key: Option<PrivateKeySigner>,

    /// Compiled token contract (e.g. `Mercury.json` or `GameItem.json`).
    #[clap(long, env, default_value = "build/contracts/Mercury.json")]
    pub token_artifact: PathBuf,

    /// Compiled market contract.
    #[clap(long, env, default_value = "build/contracts/Market.json")]
    pub market_artifact: PathBuf,

    /// Number of confirmations to wait for on every mined transaction.
    #[clap(long, env, default_value = "1")]
    pub confirmations: u64,

    /// How long to wait for a transaction receipt before giving up.
    #[clap(
        long,
        env,
        default_value = "5m",
        value_parser = humantime::parse_duration,
    )]
    pub receipt_timeout: Duration,

    /// Whether the minter grant has to be mined (`receipt`) or only accepted
    /// by the node (`submitted`) before the run is considered done.
    #[clap(long, env, value_enum, default_value = "receipt")]
    pub minter_confirmation: MinterConfirmation,

    /// Where to write the JSON record of the deployed addresses. Only written
    /// after a complete run; the address of a token left behind by a failed
    /// run is only logged.
    #[clap(long, env)]
    pub deployment_record: Option<PathBuf>,
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            logging,
            node_url,
            chain_id,
            private_key,
            token_artifact,
            market_artifact,
            confirmations,
            receipt_timeout,
            minter_confirmation,
            deployment_record,
        } = self;

        write!(f, "{logging}")?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "chain_id: {chain_id:?}")?;
        writeln!(
            f,
            "private_key: {}",
            private_key.as_ref().map_or("None", |_| "SECRET")
        )?;
        writeln!(f, "token_artifact: {}", token_artifact.display())?;
        writeln!(f, "market_artifact: {}", market_artifact.display())?;
        writeln!(f, "confirmations: {confirmations}")?;
        writeln!(f, "receipt_timeout: {receipt_timeout:?}")?;
        writeln!(f, "minter_confirmation: {minter_confirmation:?}")?;
        writeln!(f, "deployment_record: {deployment_record:?}")?;
        Ok(())
    }
}
