//! Transaction-capable smart account client.

use crate::{
    AccountError, BundlerClient, ChainClient, PaymasterClient, Result, SmartAccountDescriptor,
    UserOperation, UserOperationReceipt,
    contracts::{ISimpleAccount, entry_point_nonce},
};
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_signer::Signer;
use alloy_sol_types::SolCall;
use std::sync::Arc;
use vanguard_config::{ChainConfig, EntryPointVersion, GasFees, UserOperationDefaults};
use vanguard_wallets::AccountSigner;

/// A single call executed by the smart account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Call {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Call {
    pub fn new(to: Address, value: U256, data: Bytes) -> Self {
        Self { to, value, data }
    }
}

/// Builds, sponsors, signs and submits user operations for one smart account.
#[derive(Clone, Debug)]
pub struct SmartAccountClient {
    descriptor: SmartAccountDescriptor,
    signer: AccountSigner,
    chain: Arc<dyn ChainClient>,
    bundler: Arc<dyn BundlerClient>,
    paymaster: Option<Arc<dyn PaymasterClient>>,
    defaults: UserOperationDefaults,
}

impl SmartAccountClient {
    /// Assembles a client. Only v0.7 entry points can be submitted to.
    ///
    /// With a paymaster every operation is sponsored; without one, gas is estimated by the
    /// bundler and paid by the account.
    pub fn new(
        descriptor: SmartAccountDescriptor,
        signer: AccountSigner,
        chain: Arc<dyn ChainClient>,
        bundler: Arc<dyn BundlerClient>,
        paymaster: Option<Arc<dyn PaymasterClient>>,
    ) -> Result<Self> {
        if descriptor.entry_point != EntryPointVersion::V07 {
            return Err(AccountError::UnsupportedEntryPoint(descriptor.entry_point));
        }
        Ok(Self {
            descriptor,
            signer,
            chain,
            bundler,
            paymaster,
            defaults: UserOperationDefaults::default(),
        })
    }

    /// Overrides the gas limits used before sponsorship or estimation.
    pub fn with_defaults(mut self, defaults: UserOperationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn address(&self) -> Address {
        self.descriptor.address
    }

    pub fn descriptor(&self) -> &SmartAccountDescriptor {
        &self.descriptor
    }

    pub fn signer(&self) -> &AccountSigner {
        &self.signer
    }

    pub fn chain_config(&self) -> &ChainConfig {
        self.chain.chain()
    }

    pub fn entry_point(&self) -> Address {
        self.descriptor.entry_point.address()
    }

    pub fn is_sponsored(&self) -> bool {
        self.paymaster.is_some()
    }

    /// Whether the account contract has been deployed.
    pub async fn is_deployed(&self) -> Result<bool> {
        Ok(!self.chain.code(self.address()).await?.is_empty())
    }

    /// The next nonce for the default key.
    pub async fn nonce(&self) -> Result<U256> {
        entry_point_nonce(self.chain.as_ref(), self.entry_point(), self.address()).await
    }

    /// Native balance of the smart account.
    pub async fn balance(&self) -> Result<U256> {
        Ok(self.chain.balance(self.address()).await?)
    }

    /// `execute` for one call, `executeBatch` for several.
    pub fn encode_calls(calls: &[Call]) -> Result<Bytes> {
        let data = match calls {
            [] => return Err(AccountError::EmptyCalls),
            [call] => ISimpleAccount::executeCall {
                dest: call.to,
                value: call.value,
                func: call.data.clone(),
            }
            .abi_encode(),
            calls => ISimpleAccount::executeBatchCall {
                dest: calls.iter().map(|c| c.to).collect(),
                value: calls.iter().map(|c| c.value).collect(),
                func: calls.iter().map(|c| c.data.clone()).collect(),
            }
            .abi_encode(),
        };
        Ok(data.into())
    }

    /// Builds an unsigned operation for `calls` with gas limits filled by the paymaster or the
    /// bundler.
    pub async fn prepare_user_operation(
        &self,
        calls: &[Call],
        fees: GasFees,
    ) -> Result<UserOperation> {
        let call_data = Self::encode_calls(calls)?;
        let nonce = self.nonce().await?;
        let mut op = UserOperation::new(self.address(), nonce, call_data, fees, &self.defaults);

        if !self.is_deployed().await? {
            debug!(account = %self.address(), "account not deployed, adding init code");
            op.factory = Some(self.descriptor.factory);
            op.factory_data = Some(self.descriptor.factory_data());
        }

        match &self.paymaster {
            Some(paymaster) => {
                paymaster.sponsor_user_operation(&op, self.entry_point()).await?.apply(&mut op)
            }
            None => self.bundler.estimate_user_operation_gas(&op).await?.apply(&mut op),
        }
        Ok(op)
    }

    /// Signs `op` in place and returns its hash.
    pub async fn sign_user_operation(&self, op: &mut UserOperation) -> Result<B256> {
        let hash = op.hash(self.entry_point(), self.chain_config().id);
        let signature = self.signer.sign_message(hash.as_slice()).await?;
        op.signature = signature.as_bytes().into();
        Ok(hash)
    }

    /// Submits `calls` as one user operation and returns the user operation hash.
    pub async fn send_calls(&self, calls: &[Call], fees: GasFees) -> Result<B256> {
        let mut op = self.prepare_user_operation(calls, fees).await?;
        let local_hash = self.sign_user_operation(&mut op).await?;
        let hash = self.bundler.send_user_operation(&op).await?;
        if hash != local_hash {
            warn!(%hash, %local_hash, "bundler returned a different user operation hash");
        }
        debug!(%hash, sender = %op.sender, nonce = %op.nonce, "sent user operation");
        Ok(hash)
    }

    /// Sends `value` and `data` to `to` from the smart account.
    pub async fn send_transaction(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        fees: GasFees,
    ) -> Result<B256> {
        self.send_calls(&[Call::new(to, value, data)], fees).await
    }

    /// Looks up the receipt of a submitted operation once; does not poll.
    pub async fn user_operation_receipt(&self, hash: B256) -> Result<Option<UserOperationReceipt>> {
        self.bundler.user_operation_receipt(hash).await
    }
}
