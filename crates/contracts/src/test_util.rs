//! Artifact fixtures shared by the tests of the deployment crates.

use crate::{Artifact, Contracts, MarketArtifact, TokenArtifact};

/// Truffle layout token with `addMinter` and `isMinter`.
pub const TOKEN: &str = r#"{
    "contractName": "Mercury",
    "abi": [
        {
            "inputs": [],
            "stateMutability": "nonpayable",
            "type": "constructor"
        },
        {
            "inputs": [{ "internalType": "address", "name": "account", "type": "address" }],
            "name": "addMinter",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{ "internalType": "address", "name": "account", "type": "address" }],
            "name": "isMinter",
            "outputs": [{ "internalType": "bool", "name": "", "type": "bool" }],
            "stateMutability": "view",
            "type": "function"
        }
    ],
    "bytecode": "0x6080604052348015600f57600080fd5b50"
}"#;

/// Foundry layout market taking the token address.
pub const MARKET: &str = r#"{
    "abi": [
        {
            "inputs": [{ "internalType": "address", "name": "token", "type": "address" }],
            "stateMutability": "nonpayable",
            "type": "constructor"
        }
    ],
    "bytecode": {
        "object": "0x608060405234801561001057600080fd5b50",
        "sourceMap": "",
        "linkReferences": {}
    }
}"#;

/// Truffle layout token that can grant but not report minters.
pub const TOKEN_WITHOUT_IS_MINTER: &str = r#"{
    "abi": [
        {
            "inputs": [{ "internalType": "address", "name": "account", "type": "address" }],
            "name": "addMinter",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ],
    "bytecode": "0x6080604052348015600f57600080fd5b50"
}"#;

pub fn token(name: &str) -> TokenArtifact {
    TokenArtifact::new(Artifact::from_json(name, TOKEN).unwrap()).unwrap()
}

pub fn token_without_is_minter(name: &str) -> TokenArtifact {
    TokenArtifact::new(Artifact::from_json(name, TOKEN_WITHOUT_IS_MINTER).unwrap()).unwrap()
}

pub fn market() -> MarketArtifact {
    MarketArtifact::new(Artifact::from_json("Market", MARKET).unwrap()).unwrap()
}

pub fn contracts() -> Contracts {
    Contracts {
        token: token("Mercury"),
        market: market(),
    }
}
