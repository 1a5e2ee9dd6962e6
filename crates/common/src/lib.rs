//! Common utilities for building and using vanguard's clients.

#![warn(missing_docs, unused_crate_dependencies)]

#[macro_use]
extern crate tracing;

pub mod constants;
pub mod errors;
pub mod provider;

pub use constants::*;
pub use provider::*;
