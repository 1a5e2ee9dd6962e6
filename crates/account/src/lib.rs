//! # vanguard-account
//!
//! ERC-4337 smart account sessions.
//!
//! A [`Session`] turns an authenticated provider into a transaction-capable smart account in one
//! ordered pipeline (see [`Bootstrapper::bootstrap`]):
//!
//! 1. derive an [`AccountSigner`](vanguard_wallets::AccountSigner) from the provider
//! 2. connect the paymaster (sponsorship) client
//! 3. connect the bundler client
//! 4. connect the chain client
//! 5. compute the [`SmartAccountDescriptor`] through the account factory
//! 6. assemble the [`SmartAccountClient`]
//! 7. publish everything at once
//!
//! Consumers observe [`SessionState`] and only ever see nothing or a fully bootstrapped session.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod account;
pub mod bundler;
pub mod chain;
pub mod client;
pub mod connector;
pub mod console;
pub mod contracts;
pub mod error;
pub mod paymaster;
pub mod session;
pub mod user_operation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use account::{AccountFactory, SimpleAccountFactory, SmartAccountDescriptor};
pub use bundler::{BundlerClient, GasEstimate, HttpBundlerClient, UserOperationReceipt};
pub use chain::{ChainClient, RpcChainClient};
pub use client::{Call, SmartAccountClient};
pub use connector::{Connector, HttpConnector};
pub use console::{Console, StatusMessage};
pub use error::AccountError;
pub use paymaster::{HttpPaymasterClient, PaymasterClient, SponsorResult};
pub use session::{
    BootstrapConfig, BootstrapTask, Bootstrapped, Bootstrapper, Session, SessionState,
};
pub use user_operation::UserOperation;

/// Result alias for fallible smart account operations.
pub type Result<T, E = AccountError> = std::result::Result<T, E>;
