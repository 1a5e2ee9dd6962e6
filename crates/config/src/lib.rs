//! # vanguard-config
//!
//! Vanguard configuration: process settings, static chain metadata and contract address tables.
//!
//! Settings are layered, later sources winning:
//! 1. [`Config::default`]
//! 2. `vanguard.toml` in the working directory (or the file named by `VANGUARD_CONFIG`)
//! 3. `JIFFYSCAN_API_KEY` for the bundler API key
//! 4. `VANGUARD_*` environment variables

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, U256};
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod chain;
pub use chain::{ChainConfig, ChainTable, VANAR_MAINNET, VANAR_TESTNET};

pub mod contracts;
pub use contracts::{
    ContractAddressTable, ENTRY_POINT_V06, ENTRY_POINT_V07, EntryPointVersion, PaymasterEntry,
    SIMPLE_ACCOUNT_FACTORY,
};

pub mod defaults;
pub use defaults::{DEFAULT_BUNDLER_URL, GasFees, MIN_PAYMASTER_BALANCE, UserOperationDefaults};

mod error;
pub use error::{ConfigError, ExtractConfigError};

/// Vanguard settings, constructed once at startup and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Client id registered with the auth service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_client_id: Option<String>,
    /// API key sent to the bundler and paymaster service in the `x-api-key` header.
    ///
    /// Presence is not validated; a missing key surfaces as a request failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundler_api_key: Option<String>,
    /// Bundler and paymaster service url.
    pub bundler_url: String,
    /// Extra http headers for the bundler and paymaster service, in `name: value` form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundler_headers: Vec<String>,
    /// Chain the smart account lives on.
    pub chain_id: u64,
    pub entry_point: EntryPointVersion,
    /// `SimpleAccountFactory` deployment.
    pub factory: Address,
    /// Salt passed to the factory; accounts with different salts have different addresses.
    pub salt: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    /// Minimum entry point deposit a paymaster should hold, in wei.
    pub min_paymaster_balance: U256,
    /// Paymaster deployments per entry point and chain.
    #[serde(default)]
    pub paymasters: Vec<PaymasterEntry>,
    /// Additional chains, replacing built-in entries with the same id.
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let fees = GasFees::default();
        Self {
            auth_client_id: None,
            bundler_api_key: None,
            bundler_url: DEFAULT_BUNDLER_URL.to_string(),
            bundler_headers: vec![],
            chain_id: VANAR_TESTNET,
            entry_point: EntryPointVersion::V07,
            factory: SIMPLE_ACCOUNT_FACTORY,
            salt: 0,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            min_paymaster_balance: MIN_PAYMASTER_BALANCE,
            paymasters: vec![],
            chains: vec![],
        }
    }
}

impl Config {
    /// File name of the config file.
    pub const FILE_NAME: &'static str = "vanguard.toml";

    /// Prefix of the environment variables read into the config.
    pub const ENV_PREFIX: &'static str = "VANGUARD_";

    /// Loads the config from the current directory.
    ///
    /// See [`figment`](Self::figment) for the sources.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment())
    }

    /// Loads the config rooted at `root`.
    pub fn load_with_root(root: impl AsRef<Path>) -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment_with_root(root))
    }

    /// Attempts to extract a `Config` from `provider`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use figment::providers::{Format, Toml};
    /// use vanguard_config::Config;
    ///
    /// let figment = Config::figment().merge(Toml::file("other.toml"));
    /// let config = Config::try_from(figment);
    /// ```
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        Figment::from(provider).extract::<Self>().map_err(ExtractConfigError::new)
    }

    /// The default figment rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_with_root(".")
    }

    /// The default figment, reading `vanguard.toml` from `root`.
    pub fn figment_with_root(root: impl AsRef<Path>) -> Figment {
        let toml = Env::var("VANGUARD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| root.as_ref().join(Self::FILE_NAME));

        Figment::from(Self::default())
            .merge(Toml::file(toml))
            .merge(Env::raw().only(&["JIFFYSCAN_API_KEY"]).map(|_| "bundler_api_key".into()))
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["CONFIG"]))
    }

    /// All known chains: the built-in table with configured chains layered on top.
    pub fn chain_table(&self) -> ChainTable {
        ChainTable::builtin().with_overrides(self.chains.iter().cloned())
    }

    /// The chain the smart account is configured for.
    pub fn chain(&self) -> Result<ChainConfig, ConfigError> {
        let chain = self
            .chain_table()
            .get(self.chain_id)
            .cloned()
            .ok_or(ConfigError::UnknownChain(self.chain_id))?;
        if chain.rpc_url().is_none() {
            return Err(ConfigError::MissingRpcUrl(chain.id));
        }
        Ok(chain)
    }

    /// The configured paymaster deployments.
    pub fn contract_table(&self) -> ContractAddressTable {
        ContractAddressTable::new(self.paymasters.iter().cloned())
    }

    /// The flat fee parameters applied to every user operation.
    pub fn gas_fees(&self) -> GasFees {
        GasFees {
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
        }
    }

    /// The factory salt as an EVM word.
    pub fn salt(&self) -> U256 {
        U256::from(self.salt)
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("Vanguard Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
