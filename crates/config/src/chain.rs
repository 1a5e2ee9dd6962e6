//! Static per-network metadata.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Vanar testnet (vanguard) chain id.
pub const VANAR_TESTNET: u64 = 78600;

/// Vanar mainnet chain id.
pub const VANAR_MAINNET: u64 = 2040;

/// Songbird canary network chain id.
pub const SONGBIRD: u64 = 19;

/// The native currency of a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    fn new(name: &str, symbol: &str) -> Self {
        Self { name: name.to_string(), symbol: symbol.to_string(), decimals: 18 }
    }
}

/// RPC endpoints of a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcUrls {
    #[serde(default)]
    pub http: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ws: Vec<String>,
}

/// A block explorer front-end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExplorer {
    pub name: String,
    pub url: String,
}

/// Metadata describing a single network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Numeric EIP-155 chain id.
    pub id: u64,
    /// Display name.
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: RpcUrls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorer: Option<BlockExplorer>,
}

impl ChainConfig {
    /// Vanar testnet (vanguard).
    pub fn vanar_testnet() -> Self {
        Self {
            id: VANAR_TESTNET,
            name: "VANRY_TESTNET".to_string(),
            native_currency: NativeCurrency::new("VANRY", "VANRY"),
            rpc_urls: RpcUrls {
                http: vec!["https://rpca-vanguard.vanarchain.com/".to_string()],
                ws: vec!["wss://ws-vanguard.vanarchain.com/".to_string()],
            },
            block_explorer: Some(BlockExplorer {
                name: "Explorer".to_string(),
                url: "https://explorer-vanguard.vanarchain.com".to_string(),
            }),
        }
    }

    /// Vanar mainnet.
    pub fn vanar_mainnet() -> Self {
        Self {
            id: VANAR_MAINNET,
            name: "VANAR_MAINNET".to_string(),
            native_currency: NativeCurrency::new("VANRY", "VANRY"),
            rpc_urls: RpcUrls {
                http: vec!["https://rpc.vanarchain.com".to_string()],
                ws: vec!["wss://ws.vanarchain.com".to_string()],
            },
            block_explorer: Some(BlockExplorer {
                name: "Explorer".to_string(),
                url: "https://explorer.vanarchain.com".to_string(),
            }),
        }
    }

    /// Songbird canary network.
    pub fn songbird() -> Self {
        Self {
            id: SONGBIRD,
            name: "Songbird canary network".to_string(),
            native_currency: NativeCurrency::new("SGB", "SGB"),
            rpc_urls: RpcUrls {
                http: vec!["https://songbird-api.flare.network/ext/C/rpc".to_string()],
                ws: vec![],
            },
            block_explorer: Some(BlockExplorer {
                name: "Explorer".to_string(),
                url: "https://songbird-explorer.flare.network".to_string(),
            }),
        }
    }

    /// Returns the default HTTP RPC url, if any.
    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_urls.http.first().map(String::as_str)
    }

    /// Returns the explorer link for a transaction hash.
    pub fn explorer_tx_url(&self, hash: &B256) -> Option<String> {
        self.explorer_link("tx", &hash.to_string())
    }

    /// Returns the explorer link for an address.
    pub fn explorer_address_url(&self, address: &Address) -> Option<String> {
        self.explorer_link("address", &address.to_string())
    }

    fn explorer_link(&self, kind: &str, item: &str) -> Option<String> {
        let explorer = self.block_explorer.as_ref()?;
        Some(format!("{}/{kind}/{item}", explorer.url.trim_end_matches('/')))
    }
}

impl fmt::Display for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Read-only table of known chains, keyed by chain id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainTable {
    chains: BTreeMap<u64, ChainConfig>,
}

impl Default for ChainTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ChainTable {
    /// Creates a table from the given chains. Later entries replace earlier ones with the same
    /// id.
    pub fn new(chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        Self { chains: chains.into_iter().map(|chain| (chain.id, chain)).collect() }
    }

    /// The networks shipped with vanguard.
    pub fn builtin() -> Self {
        Self::new([
            ChainConfig::vanar_testnet(),
            ChainConfig::vanar_mainnet(),
            ChainConfig::songbird(),
        ])
    }

    /// Returns a table with `chains` layered over the current entries.
    pub fn with_overrides(mut self, chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        self.chains.extend(chains.into_iter().map(|chain| (chain.id, chain)));
        self
    }

    pub fn get(&self, id: u64) -> Option<&ChainConfig> {
        self.chains.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
