use {
    crate::{
        deployer::{Deployed, MinterGrant},
        sequencer::Deployment,
    },
    alloy::primitives::{Address, TxHash},
    anyhow::{Context, Result},
    contracts::{Artifact, Contracts},
    serde::Serialize,
    std::{fs::File, io::Write, path::Path},
};

/// Summary of a finished deployment run, written to disk so the addresses
/// can be picked up by whatever talks to the contracts next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeploymentRecord {
    pub chain_id: u64,
    pub sender: Address,
    pub token: ContractRecord,
    pub market: ContractRecord,
    pub minter_grant: MinterGrant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContractRecord {
    pub name: String,
    pub address: Address,
    pub transaction_hash: TxHash,
}

impl ContractRecord {
    fn new(artifact: &Artifact, deployed: &Deployed) -> Self {
        Self {
            name: artifact.name().to_string(),
            address: deployed.address,
            transaction_hash: deployed.transaction_hash,
        }
    }
}

impl DeploymentRecord {
    pub fn new(
        chain_id: u64,
        sender: Address,
        contracts: &Contracts,
        deployment: &Deployment,
    ) -> Self {
        Self {
            chain_id,
            sender,
            token: ContractRecord::new(contracts.token.artifact(), &deployment.token),
            market: ContractRecord::new(contracts.market.artifact(), &deployment.market),
            minter_grant: deployment.minter_grant,
        }
    }

    /// Writes the record as pretty printed JSON, replacing `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("could not create deployment record {path:?}"))?;
        serde_json::to_writer_pretty(&mut file, self).context("serialize deployment record")?;
        writeln!(file).context("write deployment record")?;
        Ok(())
    }
}
