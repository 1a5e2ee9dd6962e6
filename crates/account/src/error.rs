use alloy_transport::TransportError;
use vanguard_common::ClientBuildError;
use vanguard_config::{ConfigError, EntryPointVersion};
use vanguard_wallets::WalletError;

/// Errors raised while bootstrapping or using a smart account.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Signer(#[from] alloy_signer::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
    #[error(transparent)]
    ClientBuild(#[from] ClientBuildError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("entry point {0} is not supported, only v0.7 user operations can be submitted")]
    UnsupportedEntryPoint(EntryPointVersion),
    #[error("smart account not initialized yet")]
    NotReady,
    #[error("no calls to submit")]
    EmptyCalls,
    #[error("no tokio runtime to run the bootstrap on")]
    NoRuntime,
    #[error("bootstrap task failed: {0}")]
    Task(String),
}
