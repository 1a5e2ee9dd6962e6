//! Construction of the network clients a session needs.

use crate::{
    BootstrapConfig, BundlerClient, ChainClient, HttpBundlerClient, HttpPaymasterClient,
    PaymasterClient, Result, RpcChainClient,
};
use std::{fmt, sync::Arc, time::Duration};
use vanguard_common::{ProviderBuilder, REQUEST_TIMEOUT};

/// Creates the paymaster, bundler and chain clients for a bootstrap.
///
/// Construction binds endpoints only and must not touch the network.
pub trait Connector: Send + Sync + fmt::Debug {
    /// Client for the sponsorship service.
    fn paymaster(&self, config: &BootstrapConfig) -> Result<Arc<dyn PaymasterClient>>;

    /// Client for the bundler service.
    fn bundler(&self, config: &BootstrapConfig) -> Result<Arc<dyn BundlerClient>>;

    /// Client for the chain's public RPC.
    fn chain(&self, config: &BootstrapConfig) -> Result<Arc<dyn ChainClient>>;
}

/// Connects to HTTP JSON-RPC endpoints.
///
/// Bundler and paymaster share the bundler service url and send the API key in the `x-api-key`
/// header.
#[derive(Clone, Copy, Debug)]
pub struct HttpConnector {
    timeout: Duration,
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self { timeout: REQUEST_TIMEOUT }
    }
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn service(&self, config: &BootstrapConfig) -> ProviderBuilder {
        ProviderBuilder::new(&config.bundler_url)
            .timeout(self.timeout)
            .api_key(config.api_key.as_deref())
            .headers(config.headers.clone())
    }
}

impl Connector for HttpConnector {
    fn paymaster(&self, config: &BootstrapConfig) -> Result<Arc<dyn PaymasterClient>> {
        let client = self.service(config).build_client()?;
        Ok(Arc::new(HttpPaymasterClient::new(client, config.chain.id)))
    }

    fn bundler(&self, config: &BootstrapConfig) -> Result<Arc<dyn BundlerClient>> {
        let client = self.service(config).build_client()?;
        Ok(Arc::new(HttpBundlerClient::new(client, config.entry_point.address())))
    }

    fn chain(&self, config: &BootstrapConfig) -> Result<Arc<dyn ChainClient>> {
        Ok(Arc::new(RpcChainClient::new(config.chain.clone(), self.timeout)?))
    }
}
