//! ERC-4337 bundler JSON-RPC client.

use crate::{Result, UserOperation};
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_client::RpcClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gas limits returned by `eth_estimateUserOperationGas`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimate {
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_verification_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_post_op_gas_limit: Option<U256>,
}

impl GasEstimate {
    /// Replaces the gas limits of `op` with the estimate.
    pub fn apply(&self, op: &mut UserOperation) {
        op.pre_verification_gas = self.pre_verification_gas;
        op.verification_gas_limit = self.verification_gas_limit;
        op.call_gas_limit = self.call_gas_limit;
        if op.paymaster.is_some() {
            op.paymaster_verification_gas_limit =
                self.paymaster_verification_gas_limit.or(op.paymaster_verification_gas_limit);
            op.paymaster_post_op_gas_limit =
                self.paymaster_post_op_gas_limit.or(op.paymaster_post_op_gas_limit);
        }
    }
}

/// The transaction a user operation was included in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionReceipt {
    pub transaction_hash: B256,
    pub block_number: U256,
}

/// Result of `eth_getUserOperationReceipt`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    pub user_op_hash: B256,
    pub sender: Address,
    pub nonce: U256,
    #[serde(default)]
    pub entry_point: Option<Address>,
    #[serde(default)]
    pub paymaster: Option<Address>,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    pub success: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub receipt: Option<InclusionReceipt>,
}

/// A bundler accepting v0.7 user operations for one entry point.
#[async_trait]
pub trait BundlerClient: Send + Sync + fmt::Debug {
    /// The entry point operations are submitted to.
    fn entry_point(&self) -> Address;

    /// `eth_sendUserOperation`. Returns the user operation hash without waiting for inclusion.
    async fn send_user_operation(&self, op: &UserOperation) -> Result<B256>;

    /// `eth_estimateUserOperationGas`
    async fn estimate_user_operation_gas(&self, op: &UserOperation) -> Result<GasEstimate>;

    /// `eth_getUserOperationReceipt`. `None` while the operation is pending or unknown.
    async fn user_operation_receipt(&self, hash: B256) -> Result<Option<UserOperationReceipt>>;

    /// `eth_supportedEntryPoints`
    async fn supported_entry_points(&self) -> Result<Vec<Address>>;
}

/// A [`BundlerClient`] speaking JSON-RPC over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBundlerClient {
    client: RpcClient,
    entry_point: Address,
}

impl HttpBundlerClient {
    pub fn new(client: RpcClient, entry_point: Address) -> Self {
        Self { client, entry_point }
    }
}

#[async_trait]
impl BundlerClient for HttpBundlerClient {
    fn entry_point(&self) -> Address {
        self.entry_point
    }

    async fn send_user_operation(&self, op: &UserOperation) -> Result<B256> {
        trace!(sender = %op.sender, nonce = %op.nonce, "eth_sendUserOperation");
        let hash =
            self.client.request("eth_sendUserOperation", (op.clone(), self.entry_point)).await?;
        Ok(hash)
    }

    async fn estimate_user_operation_gas(&self, op: &UserOperation) -> Result<GasEstimate> {
        trace!(sender = %op.sender, "eth_estimateUserOperationGas");
        let estimate = self
            .client
            .request("eth_estimateUserOperationGas", (op.clone(), self.entry_point))
            .await?;
        Ok(estimate)
    }

    async fn user_operation_receipt(&self, hash: B256) -> Result<Option<UserOperationReceipt>> {
        let receipt = self.client.request("eth_getUserOperationReceipt", (hash,)).await?;
        Ok(receipt)
    }

    async fn supported_entry_points(&self) -> Result<Vec<Address>> {
        let entry_points = self.client.request_noparams("eth_supportedEntryPoints").await?;
        Ok(entry_points)
    }
}
