//! Construction of the JSON-RPC providers (clients communicating with the
//! blockchain) used by the deployment tooling.

use {
    alloy::{
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Creates a provider speaking JSON-RPC over HTTP to the given node.
pub fn provider(url: &Url) -> AlloyProvider {
    let rpc = ClientBuilder::default().http(url.clone());
    ProviderBuilder::new().connect_client(rpc).erased()
}

/// Creates a provider whose responses are fed from the given asserter.
/// Useful for exercising RPC failure modes in tests.
#[cfg(any(test, feature = "test-util"))]
pub fn mocked_provider(asserter: alloy::providers::mock::Asserter) -> AlloyProvider {
    ProviderBuilder::new()
        .connect_mocked_client(asserter)
        .erased()
}
