use crate::WalletError;
use alloy_primitives::{Address, ChainId};
use alloy_signer::{Signature, Signer};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::fmt;

/// The subset of an [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) provider a session needs.
///
/// Handed out by an [`AuthClient`](crate::AuthClient) once the user has logged in and held only
/// for the duration of that session.
#[async_trait]
pub trait Eip1193Provider: Send + Sync + fmt::Debug {
    /// `eth_requestAccounts`. The first account is the one used for signing.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// `personal_sign`: an [EIP-191](https://eips.ethereum.org/EIPS/eip-191) signature of
    /// `message` by `address`.
    async fn personal_sign(&self, message: &[u8], address: Address)
    -> Result<Signature, WalletError>;

    /// `eth_chainId`
    async fn chain_id(&self) -> Result<ChainId, WalletError>;
}

/// A provider backed by a private key held in memory.
#[derive(Clone)]
pub struct LocalKeyProvider {
    signer: PrivateKeySigner,
    chain_id: ChainId,
}

impl LocalKeyProvider {
    pub fn new(signer: PrivateKeySigner, chain_id: ChainId) -> Self {
        Self { signer, chain_id }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for LocalKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeyProvider")
            .field("address", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

#[async_trait]
impl Eip1193Provider for LocalKeyProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    async fn personal_sign(
        &self,
        message: &[u8],
        address: Address,
    ) -> Result<Signature, WalletError> {
        if address != self.signer.address() {
            return Err(WalletError::UnknownAccount(address));
        }
        Ok(self.signer.sign_message(message).await?)
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        Ok(self.chain_id)
    }
}
