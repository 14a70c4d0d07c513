mod instrumentation;

#[cfg(any(test, feature = "test-util"))]
use alloy::providers::mock::Asserter;
use {
    crate::AlloyProvider,
    alloy::{
        network::{EthereumWallet, TxSigner},
        primitives::Signature,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::InstrumentationLayer,
    url::Url,
};

pub type Signer = Box<dyn TxSigner<Signature> + Send + Sync + 'static>;

/// Creates a provider talking to the node at `url`.
///
/// With a `signer` transactions get signed locally and submitted with
/// `eth_sendRawTransaction`. Without one they are handed to the node via
/// `eth_sendTransaction`, so the sending account has to be unlocked there.
pub fn provider(url: &Url, signer: Option<Signer>) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(InstrumentationLayer {
            label: "deployer".into(),
        })
        .http(url.clone());

    match signer {
        Some(signer) => ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_client(rpc)
            .erased(),
        None => ProviderBuilder::new().connect_client(rpc).erased(),
    }
}

/// Provider answering requests with the responses queued on `asserter`.
///
/// Transactions are sent exactly as built. No gas, nonce or chain id lookups
/// are made on their behalf, so every queued response belongs to a call the
/// test makes itself.
#[cfg(any(test, feature = "test-util"))]
pub fn mocked_provider(asserter: Asserter) -> AlloyProvider {
    ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_mocked_client(asserter)
        .erased()
}
