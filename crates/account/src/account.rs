//! Smart account address derivation.

use crate::{ChainClient, Result, contracts::ISimpleAccountFactory};
use alloy_primitives::{Address, Bytes, U256};
use alloy_signer::Signer;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::fmt;
use vanguard_config::EntryPointVersion;
use vanguard_wallets::AccountSigner;

/// Identity of a counterfactual smart account.
///
/// The address is fixed by `(factory, owner, entry point, salt)` and known before deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmartAccountDescriptor {
    pub address: Address,
    pub owner: Address,
    pub factory: Address,
    pub entry_point: EntryPointVersion,
    pub salt: U256,
}

impl SmartAccountDescriptor {
    /// `createAccount(owner, salt)` calldata for the factory, sent as `factoryData` while the
    /// account is not deployed.
    pub fn factory_data(&self) -> Bytes {
        ISimpleAccountFactory::createAccountCall { owner: self.owner, salt: self.salt }
            .abi_encode()
            .into()
    }
}

impl fmt::Display for SmartAccountDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (owner {}, entry point {})", self.address, self.owner, self.entry_point)
    }
}

/// Computes smart account addresses.
#[async_trait]
pub trait AccountFactory: Send + Sync + fmt::Debug {
    /// Resolves the account owned by `signer` for the given entry point and factory.
    async fn compute_account_address(
        &self,
        chain: &dyn ChainClient,
        signer: &AccountSigner,
        entry_point: EntryPointVersion,
        factory: Address,
    ) -> Result<SmartAccountDescriptor>;
}

/// eth-infinitism `SimpleAccountFactory`: asks the factory's `getAddress` view.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleAccountFactory {
    salt: U256,
}

impl SimpleAccountFactory {
    pub fn new(salt: U256) -> Self {
        Self { salt }
    }
}

#[async_trait]
impl AccountFactory for SimpleAccountFactory {
    async fn compute_account_address(
        &self,
        chain: &dyn ChainClient,
        signer: &AccountSigner,
        entry_point: EntryPointVersion,
        factory: Address,
    ) -> Result<SmartAccountDescriptor> {
        let owner = signer.address();
        let call = ISimpleAccountFactory::getAddressCall { owner, salt: self.salt };
        let ret = chain.call(factory, call.abi_encode().into()).await?;
        let address = ISimpleAccountFactory::getAddressCall::abi_decode_returns(&ret)?;
        debug!(%address, %owner, %factory, %entry_point, "computed smart account address");
        Ok(SmartAccountDescriptor { address, owner, factory, entry_point, salt: self.salt })
    }
}
