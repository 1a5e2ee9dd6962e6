//! Read-only chain queries.

use crate::Result;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_transport::TransportError;
use async_trait::async_trait;
use std::{fmt, time::Duration};
use vanguard_common::{ChainProvider, ProviderBuilder};
use vanguard_config::{ChainConfig, ConfigError};

/// Queries against the chain the smart account lives on.
#[async_trait]
pub trait ChainClient: Send + Sync + fmt::Debug {
    /// The chain this client is bound to.
    fn chain(&self) -> &ChainConfig;

    /// Native balance of `address` at the latest block.
    async fn balance(&self, address: Address) -> Result<U256, TransportError>;

    /// Deployed code of `address`; empty for externally owned or undeployed accounts.
    async fn code(&self, address: Address) -> Result<Bytes, TransportError>;

    /// `eth_call` of `input` against `to` at the latest block.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, TransportError>;
}

/// A [`ChainClient`] talking to the chain's public JSON-RPC endpoint.
#[derive(Clone, Debug)]
pub struct RpcChainClient {
    chain: ChainConfig,
    provider: ChainProvider,
}

impl RpcChainClient {
    /// Connects to the first HTTP RPC url of `chain`.
    ///
    /// Only builds the transport; no request is made.
    pub fn new(chain: ChainConfig, timeout: Duration) -> Result<Self> {
        let url = chain.rpc_url().ok_or(ConfigError::MissingRpcUrl(chain.id))?;
        let provider = ProviderBuilder::new(url).timeout(timeout).build()?;
        Ok(Self { chain, provider })
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    async fn balance(&self, address: Address) -> Result<U256, TransportError> {
        self.provider.get_balance(address).await
    }

    async fn code(&self, address: Address) -> Result<Bytes, TransportError> {
        self.provider.get_code_at(address).await
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, TransportError> {
        let tx = TransactionRequest::default().to(to).input(TransactionInput::new(input));
        self.provider.call(tx).await
    }
}
