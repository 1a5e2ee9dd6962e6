//! # vanguard-wallets
//!
//! Authenticated providers handed out by an auth service, and the derivation of a transaction
//! signer from them.
//!
//! The auth service is modelled by [`AuthClient`]; a successful login yields an
//! [`Eip1193Provider`], the provider interface browser wallets expose
//! ([EIP-1193](https://eips.ethereum.org/EIPS/eip-1193)). [`provider_to_signer`] wraps that
//! provider into an [`AccountSigner`] usable wherever an `alloy` [`Signer`](alloy_signer::Signer)
//! is expected.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod auth;
pub mod error;
pub mod provider;
pub mod raw_wallet;
pub mod signer;
pub mod utils;

pub use auth::{AuthClient, LocalAuthClient};
pub use error::{PrivateKeyError, WalletError};
pub use provider::{Eip1193Provider, LocalKeyProvider};
pub use raw_wallet::RawWallet;
pub use signer::{AccountSigner, provider_to_signer};
