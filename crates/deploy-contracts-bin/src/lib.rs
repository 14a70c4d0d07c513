pub mod arguments;
pub mod deployer;
pub mod record;
pub mod sequencer;

use {
    anyhow::{Context, Result},
    contracts::Contracts,
    deployer::{OnchainDeployer, Settings},
    record::DeploymentRecord,
};

pub async fn run(args: arguments::Arguments) -> Result<()> {
    let contracts = Contracts::load(&args.token_artifact, &args.market_artifact)
        .context("failed to load contract artifacts")?;

    let signer = args.private_key.as_ref().map(|signer| signer.address());
    let provider = ethrpc::alloy::provider(
        &args.node_url,
        args.private_key
            .map(|signer| Box::new(signer) as ethrpc::alloy::Signer),
    );
    let deployer = OnchainDeployer::connect(
        provider,
        signer,
        args.chain_id,
        Settings {
            confirmations: args.confirmations,
            receipt_timeout: args.receipt_timeout,
        },
    )
    .await?;

    let deployment = sequencer::run(&deployer, &contracts, args.minter_confirmation).await?;
    let record =
        DeploymentRecord::new(deployer.chain_id(), deployer.sender(), &contracts, &deployment);
    tracing::info!(
        token = ?record.token.address,
        market = ?record.market.address,
        "deployment finished"
    );

    if let Some(path) = &args.deployment_record {
        record.write(path)?;
        tracing::info!(?path, "wrote deployment record");
    }
    Ok(())
}
