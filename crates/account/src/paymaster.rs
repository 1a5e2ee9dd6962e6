//! Paymaster (gas sponsorship) JSON-RPC client.

use crate::{Result, UserOperation};
use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_client::RpcClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Paymaster fields and gas limits returned by `pm_sponsorUserOperation`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorResult {
    pub paymaster: Address,
    #[serde(default)]
    pub paymaster_data: Bytes,
    pub paymaster_verification_gas_limit: U256,
    pub paymaster_post_op_gas_limit: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_verification_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_gas_limit: Option<U256>,
}

impl SponsorResult {
    /// Fills the paymaster fields of `op` and takes over any gas limit the paymaster returned.
    pub fn apply(&self, op: &mut UserOperation) {
        op.paymaster = Some(self.paymaster);
        op.paymaster_data = Some(self.paymaster_data.clone());
        op.paymaster_verification_gas_limit = Some(self.paymaster_verification_gas_limit);
        op.paymaster_post_op_gas_limit = Some(self.paymaster_post_op_gas_limit);
        if let Some(gas) = self.pre_verification_gas {
            op.pre_verification_gas = gas;
        }
        if let Some(gas) = self.verification_gas_limit {
            op.verification_gas_limit = gas;
        }
        if let Some(gas) = self.call_gas_limit {
            op.call_gas_limit = gas;
        }
    }
}

/// A paymaster service sponsoring user operations.
#[async_trait]
pub trait PaymasterClient: Send + Sync + fmt::Debug {
    /// `pm_sponsorUserOperation`
    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        entry_point: Address,
    ) -> Result<SponsorResult>;
}

/// A [`PaymasterClient`] speaking JSON-RPC over HTTP.
#[derive(Clone, Debug)]
pub struct HttpPaymasterClient {
    client: RpcClient,
    chain_id: u64,
}

impl HttpPaymasterClient {
    pub fn new(client: RpcClient, chain_id: u64) -> Self {
        Self { client, chain_id }
    }
}

#[async_trait]
impl PaymasterClient for HttpPaymasterClient {
    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        entry_point: Address,
    ) -> Result<SponsorResult> {
        trace!(sender = %op.sender, chain_id = self.chain_id, "pm_sponsorUserOperation");
        let sponsored =
            self.client.request("pm_sponsorUserOperation", (op.clone(), entry_point)).await?;
        Ok(sponsored)
    }
}
