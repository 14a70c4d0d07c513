//! Compiled contract artifacts.
//!
//! Artifacts are loaded from explicit paths and checked against the shape the
//! deployment needs before anything is sent to the chain. Truffle
//! (`"bytecode": "0x..."`) as well as Foundry and Hardhat
//! (`"bytecode": {"object": "0x..."}`) layouts are understood.

use {
    alloy::{
        json_abi::{ContractObject, JsonAbi, Param},
        primitives::{Address, Bytes},
        sol_types::SolValue,
    },
    std::{
        ffi::OsStr,
        path::{Path, PathBuf},
    },
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("artifact path {0:?} has no usable file name")]
    InvalidPath(PathBuf),
    #[error("failed to read artifact {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artifact {name} is not a valid contract JSON")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("artifact {0} has no ABI")]
    MissingAbi(String),
    #[error("artifact {0} has no creation bytecode")]
    MissingBytecode(String),
    #[error("contract {name} does not expose {function}")]
    MissingFunction {
        name: String,
        function: &'static str,
    },
    #[error("contract {name} has constructor {found} but {expected} is required")]
    UnexpectedConstructor {
        name: String,
        expected: &'static str,
        found: String,
    },
}

/// ABI and creation bytecode of a compiled contract.
#[derive(Debug, Clone)]
pub struct Artifact {
    name: String,
    abi: JsonAbi,
    bytecode: Bytes,
}

impl Artifact {
    /// Reads the artifact at `path`. The contract name is the file stem, so
    /// `build/contracts/Mercury.json` yields `Mercury`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let name = path
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| Error::InvalidPath(path.to_owned()))?;
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(name, &json)
    }

    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, Error> {
        let name = name.into();
        let object: ContractObject = match serde_json::from_str(json) {
            Ok(object) => object,
            Err(source) => return Err(Error::Json { name, source }),
        };
        let Some(abi) = object.abi else {
            return Err(Error::MissingAbi(name));
        };
        // Interfaces and abstract contracts compile to empty bytecode.
        let Some(bytecode) = object.bytecode.filter(|code| !code.is_empty()) else {
            return Err(Error::MissingBytecode(name));
        };
        Ok(Self {
            name,
            abi,
            bytecode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// Whether the contract has a function `name` taking exactly `inputs`.
    pub fn has_function(&self, name: &str, inputs: &[&str]) -> bool {
        self.abi.functions().any(|function| {
            function.name == name && types_match(&function.inputs, inputs)
        })
    }

    /// Constructor parameters. Contracts without an explicit constructor take
    /// none.
    pub fn constructor_inputs(&self) -> &[Param] {
        self.abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default()
    }

    fn constructor_signature(&self) -> String {
        let types: Vec<_> = self
            .constructor_inputs()
            .iter()
            .map(|param| param.selector_type().into_owned())
            .collect();
        format!("constructor({})", types.join(","))
    }
}

fn types_match(params: &[Param], expected: &[&str]) -> bool {
    params.len() == expected.len()
        && params
            .iter()
            .zip(expected)
            .all(|(param, ty)| param.selector_type() == *ty)
}

/// Token contract with a minter role (`Mercury`, `GameItem`, ...).
#[derive(Debug, Clone)]
pub struct TokenArtifact(Artifact);

impl TokenArtifact {
    pub fn new(artifact: Artifact) -> Result<Self, Error> {
        if !artifact.constructor_inputs().is_empty() {
            return Err(Error::UnexpectedConstructor {
                found: artifact.constructor_signature(),
                name: artifact.name,
                expected: "constructor()",
            });
        }
        if !artifact.has_function("addMinter", &["address"]) {
            return Err(Error::MissingFunction {
                name: artifact.name,
                function: "addMinter(address)",
            });
        }
        Ok(Self(artifact))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        Self::new(Artifact::load(path)?)
    }

    pub fn artifact(&self) -> &Artifact {
        &self.0
    }

    /// Whether granted roles can be read back with `isMinter(address)`.
    pub fn exposes_is_minter(&self) -> bool {
        self.0.has_function("isMinter", &["address"])
    }
}

/// Market contract that gets constructed with the token address.
#[derive(Debug, Clone)]
pub struct MarketArtifact(Artifact);

impl MarketArtifact {
    pub fn new(artifact: Artifact) -> Result<Self, Error> {
        if !types_match(artifact.constructor_inputs(), &["address"]) {
            return Err(Error::UnexpectedConstructor {
                found: artifact.constructor_signature(),
                name: artifact.name,
                expected: "constructor(address)",
            });
        }
        Ok(Self(artifact))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        Self::new(Artifact::load(path)?)
    }

    pub fn artifact(&self) -> &Artifact {
        &self.0
    }

    /// ABI encoded constructor arguments for a market trading `token`.
    pub fn constructor_args(&self, token: Address) -> Bytes {
        (token,).abi_encode_params().into()
    }
}

/// The contracts one deployment run creates.
#[derive(Debug, Clone)]
pub struct Contracts {
    pub token: TokenArtifact,
    pub market: MarketArtifact,
}

impl Contracts {
    pub fn load(token: &Path, market: &Path) -> Result<Self, Error> {
        Ok(Self {
            token: TokenArtifact::load(token)?,
            market: MarketArtifact::load(market)?,
        })
    }
}
