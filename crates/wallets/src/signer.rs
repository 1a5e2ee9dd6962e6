use crate::{Eip1193Provider, WalletError};
use alloy_primitives::{Address, B256, ChainId};
use alloy_signer::{Result, Signature, Signer};
use async_trait::async_trait;
use std::sync::Arc;

/// A signer that delegates to an authenticated [`Eip1193Provider`].
///
/// Derived once per provider with [`provider_to_signer`]; a new provider requires a new signer.
#[derive(Clone, Debug)]
pub struct AccountSigner {
    provider: Arc<dyn Eip1193Provider>,
    address: Address,
    chain_id: Option<ChainId>,
}

/// Derives the [`AccountSigner`] for the first account exposed by `provider`.
///
/// Fails if the provider rejects the account request, e.g. because the user denied access.
pub async fn provider_to_signer(
    provider: Arc<dyn Eip1193Provider>,
) -> Result<AccountSigner, WalletError> {
    let accounts = provider.request_accounts().await?;
    let address = accounts.first().copied().ok_or(WalletError::NoAccounts)?;
    let chain_id = provider.chain_id().await?;
    debug!(%address, chain_id, "derived account signer");
    Ok(AccountSigner { provider, address, chain_id: Some(chain_id) })
}

impl AccountSigner {
    /// The provider this signer was derived from.
    pub fn provider(&self) -> &Arc<dyn Eip1193Provider> {
        &self.provider
    }

    /// Whether this signer was derived from `provider`.
    pub fn is_derived_from(&self, provider: &Arc<dyn Eip1193Provider>) -> bool {
        Arc::ptr_eq(&self.provider, provider)
    }
}

#[async_trait]
impl Signer for AccountSigner {
    async fn sign_hash(&self, _hash: &B256) -> Result<Signature> {
        // EIP-1193 providers only expose prefixed message signing
        Err(alloy_signer::Error::other(
            "authenticated providers cannot sign raw hashes. Use sign_message instead.",
        ))
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.provider.personal_sign(message, self.address).await.map_err(alloy_signer::Error::other)
    }

    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    fn set_chain_id(&mut self, chain_id: Option<ChainId>) {
        self.chain_id = chain_id;
    }
}
