use alloy_primitives::{Address, hex::FromHexError};
use alloy_signer_local::LocalSignerError;

#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error("Failed to create wallet from private key. Private key is invalid hex: {0}")]
    InvalidHex(#[from] FromHexError),
    #[error("Failed to create wallet from private key: {0}")]
    InvalidKey(String),
    #[error(
        "Failed to create wallet from private key. Invalid private key. But env var {0} exists. Is the `$` anchor missing?"
    )]
    ExistsAsEnvVar(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: &'static str, reason: String },
    #[error("auth client is not initialized")]
    NotInitialized,
    #[error("no wallet connected")]
    NotConnected,
    #[error("provider returned no accounts")]
    NoAccounts,
    #[error("account {0} is not managed by this provider")]
    UnknownAccount(Address),
    #[error(transparent)]
    PrivateKey(#[from] PrivateKeyError),
    #[error(transparent)]
    Local(#[from] LocalSignerError),
    #[error(transparent)]
    Signer(#[from] alloy_signer::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// The user or the auth service declined `operation`.
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected { operation, reason: reason.into() }
    }
}
