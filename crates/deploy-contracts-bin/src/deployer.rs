//! Sends the deployment transactions.
//!
//! The [`Deployer`] trait is the boundary between the deployment sequence and
//! the chain so the sequence can be tested against a mock.

use {
    alloy::{
        network::{Ethereum, ReceiptResponse, TransactionBuilder},
        primitives::{Address, Bytes, TxHash},
        providers::{PendingTransactionBuilder, Provider},
        rpc::types::{TransactionReceipt, TransactionRequest},
    },
    anyhow::{Context, Result, ensure},
    contracts::{Artifact, alloy::MinterRole},
    ethrpc::AlloyProvider,
    serde::Serialize,
    std::time::Duration,
};

/// A contract created by a deployment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployed {
    pub address: Address,
    pub transaction_hash: TxHash,
}

/// How far the minter grant has to progress before the run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MinterConfirmation {
    /// Wait until the transaction is mined and check that it succeeded.
    Receipt,
    /// Return as soon as the node accepted the transaction.
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrantStatus {
    Mined,
    Submitted,
}

/// Outcome of granting the minter role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MinterGrant {
    pub transaction_hash: TxHash,
    pub status: GrantStatus,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
    /// Creates a contract from `artifact` and waits until it is mined.
    /// `constructor_args` are the ABI encoded constructor arguments appended
    /// to the creation bytecode.
    async fn deploy(&self, artifact: &Artifact, constructor_args: Bytes) -> Result<Deployed>;

    /// Calls `addMinter(minter)` on `token`.
    async fn add_minter(
        &self,
        token: Address,
        minter: Address,
        confirmation: MinterConfirmation,
    ) -> Result<MinterGrant>;

    /// Calls `isMinter(account)` on `token`.
    async fn is_minter(&self, token: Address, account: Address) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Confirmations to wait for on every mined transaction.
    pub confirmations: u64,
    /// Maximum time to wait for a receipt.
    pub receipt_timeout: Duration,
}

/// [`Deployer`] sending real transactions through an alloy provider.
pub struct OnchainDeployer {
    provider: AlloyProvider,
    chain_id: u64,
    sender: Address,
    settings: Settings,
}

impl OnchainDeployer {
    /// Checks the connected chain and resolves the sending account.
    ///
    /// `signer` is the address of the key the provider signs with. Without
    /// one the node's first unlocked account sends the transactions.
    pub async fn connect(
        provider: AlloyProvider,
        signer: Option<Address>,
        expected_chain_id: Option<u64>,
        settings: Settings,
    ) -> Result<Self> {
        let chain_id = provider
            .get_chain_id()
            .await
            .context("could not fetch current chain id")?;
        if let Some(expected) = expected_chain_id {
            ensure!(
                chain_id == expected,
                "node is connected to chain {chain_id} but chain {expected} was expected"
            );
        }

        let sender = match signer {
            Some(address) => address,
            None => provider
                .get_accounts()
                .await
                .context("could not fetch node accounts")?
                .first()
                .copied()
                .context("node has no unlocked account to deploy from")?,
        };
        let balance = provider
            .get_balance(sender)
            .await
            .context("could not fetch balance of the sending account")?;
        tracing::info!(chain_id, ?sender, %balance, ?settings, "connected deployer");

        Ok(Self {
            provider,
            chain_id,
            sender,
            settings,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Contract creation sent from the deploying account. Its input is the
    /// creation bytecode followed by the encoded constructor arguments.
    fn creation_request(
        &self,
        artifact: &Artifact,
        constructor_args: &Bytes,
    ) -> TransactionRequest {
        let code: Bytes = [&artifact.bytecode()[..], &constructor_args[..]]
            .concat()
            .into();
        TransactionRequest::default()
            .with_from(self.sender)
            .with_deploy_code(code)
    }

    async fn confirm(
        &self,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> Result<TransactionReceipt> {
        let tx_hash = *pending.tx_hash();
        let receipt = pending
            .with_required_confirmations(self.settings.confirmations)
            .with_timeout(Some(self.settings.receipt_timeout))
            .get_receipt()
            .await
            .with_context(|| format!("no receipt for transaction {tx_hash:?}"))?;
        ensure!(receipt.status(), "transaction {tx_hash:?} reverted");
        Ok(receipt)
    }
}

#[async_trait::async_trait]
impl Deployer for OnchainDeployer {
    async fn deploy(&self, artifact: &Artifact, constructor_args: Bytes) -> Result<Deployed> {
        let tx = self.creation_request(artifact, &constructor_args);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .with_context(|| format!("could not submit {} deployment", artifact.name()))?;
        tracing::debug!(
            contract = artifact.name(),
            tx = ?pending.tx_hash(),
            "submitted deployment"
        );

        let receipt = self.confirm(pending).await?;
        let address = receipt
            .contract_address()
            .context("receipt of contract creation carries no address")?;
        Ok(Deployed {
            address,
            transaction_hash: receipt.transaction_hash,
        })
    }

    async fn add_minter(
        &self,
        token: Address,
        minter: Address,
        confirmation: MinterConfirmation,
    ) -> Result<MinterGrant> {
        let pending = MinterRole::new(token, self.provider.clone())
            .addMinter(minter)
            .from(self.sender)
            .send()
            .await
            .context("could not submit addMinter transaction")?;
        let transaction_hash = *pending.tx_hash();
        tracing::debug!(?token, ?minter, tx = ?transaction_hash, "submitted addMinter");

        let status = match confirmation {
            MinterConfirmation::Submitted => GrantStatus::Submitted,
            MinterConfirmation::Receipt => {
                self.confirm(pending).await?;
                GrantStatus::Mined
            }
        };
        Ok(MinterGrant {
            transaction_hash,
            status,
        })
    }

    async fn is_minter(&self, token: Address, account: Address) -> Result<bool> {
        MinterRole::new(token, self.provider.clone())
            .isMinter(account)
            .call()
            .await
            .context("isMinter call failed")
    }
}
