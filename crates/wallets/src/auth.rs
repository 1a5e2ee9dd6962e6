use crate::{Eip1193Provider, LocalKeyProvider, WalletError};
use alloy_primitives::ChainId;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{fmt, sync::Arc};

/// A wallet authentication service.
///
/// `initialize` must complete before `connect`. A successful `connect` hands out the
/// authenticated provider; `logout` ends the session.
#[async_trait]
pub trait AuthClient: Send + Sync + fmt::Debug {
    /// Prepares the client. Restores the provider of a persisted session, if any.
    async fn initialize(&self) -> Result<(), WalletError>;

    /// Logs the user in and returns the authenticated provider.
    async fn connect(&self) -> Result<Arc<dyn Eip1193Provider>, WalletError>;

    /// Ends the session.
    async fn logout(&self) -> Result<(), WalletError>;

    /// Whether a user is currently logged in.
    fn connected(&self) -> bool;

    /// The provider of the current session.
    fn provider(&self) -> Option<Arc<dyn Eip1193Provider>>;
}

#[derive(Debug, Default)]
struct SessionState {
    initialized: bool,
    provider: Option<Arc<dyn Eip1193Provider>>,
}

/// An [`AuthClient`] that logs in with locally held key material.
///
/// Stands in for a hosted login widget: "logging in" hands out a [`LocalKeyProvider`] for the
/// configured key.
pub struct LocalAuthClient {
    client_id: Option<String>,
    key: Option<PrivateKeySigner>,
    chain_id: ChainId,
    state: Mutex<SessionState>,
}

impl LocalAuthClient {
    pub fn new(
        client_id: Option<String>,
        key: Option<PrivateKeySigner>,
        chain_id: ChainId,
    ) -> Self {
        Self { client_id, key, chain_id, state: Mutex::default() }
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}

impl fmt::Debug for LocalAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAuthClient")
            .field("client_id", &self.client_id)
            .field("has_key", &self.key.is_some())
            .field("chain_id", &self.chain_id)
            .field("connected", &self.connected())
            .finish()
    }
}

#[async_trait]
impl AuthClient for LocalAuthClient {
    async fn initialize(&self) -> Result<(), WalletError> {
        self.state.lock().initialized = true;
        debug!(client_id = ?self.client_id, "auth client initialized");
        Ok(())
    }

    async fn connect(&self) -> Result<Arc<dyn Eip1193Provider>, WalletError> {
        if !self.state.lock().initialized {
            return Err(WalletError::NotInitialized);
        }
        let Some(key) = self.key.clone() else {
            return Err(WalletError::rejected("login", "no private key or mnemonic configured"));
        };
        let provider: Arc<dyn Eip1193Provider> =
            Arc::new(LocalKeyProvider::new(key, self.chain_id));
        self.state.lock().provider = Some(provider.clone());
        debug!(?provider, "logged in");
        Ok(provider)
    }

    async fn logout(&self) -> Result<(), WalletError> {
        let mut state = self.state.lock();
        if state.provider.take().is_none() {
            return Err(WalletError::NotConnected);
        }
        debug!("logged out");
        Ok(())
    }

    fn connected(&self) -> bool {
        self.state.lock().provider.is_some()
    }

    fn provider(&self) -> Option<Arc<dyn Eip1193Provider>> {
        self.state.lock().provider.clone()
    }
}
