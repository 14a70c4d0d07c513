pub mod alloy;
pub mod artifact;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use artifact::{Artifact, Contracts, Error, MarketArtifact, TokenArtifact};
