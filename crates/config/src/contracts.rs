//! Well-known ERC-4337 contract addresses.

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Canonical `EntryPoint` v0.6 deployment.
pub const ENTRY_POINT_V06: Address = address!("0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

/// Canonical `EntryPoint` v0.7 deployment.
pub const ENTRY_POINT_V07: Address = address!("0x0000000071727De22E5E9d8BAf0edAc6f37da032");

/// `SimpleAccountFactory` used by the vanguard demo accounts.
pub const SIMPLE_ACCOUNT_FACTORY: Address = address!("0x41f9E11556e0119E452dF67B2311EC46071ad6c7");

/// Version of the entry point contract an account is bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntryPointVersion {
    #[serde(rename = "v0.6", alias = "0.6")]
    V06,
    #[default]
    #[serde(rename = "v0.7", alias = "0.7")]
    V07,
}

impl EntryPointVersion {
    /// Address of the canonical deployment of this version.
    pub const fn address(self) -> Address {
        match self {
            Self::V06 => ENTRY_POINT_V06,
            Self::V07 => ENTRY_POINT_V07,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V06 => "v0.6",
            Self::V07 => "v0.7",
        }
    }
}

impl fmt::Display for EntryPointVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPointVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches(['v', 'V']) {
            "0.6" | "06" => Ok(Self::V06),
            "0.7" | "07" => Ok(Self::V07),
            _ => Err(format!("unknown entry point version: {s}")),
        }
    }
}

/// A paymaster deployment for one (entry point, chain) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymasterEntry {
    pub entry_point: EntryPointVersion,
    pub chain_id: u64,
    pub address: Address,
}

/// Read-only mapping of `(entry point version, chain id)` to paymaster contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractAddressTable {
    paymasters: BTreeMap<(EntryPointVersion, u64), Address>,
}

impl ContractAddressTable {
    pub fn new(entries: impl IntoIterator<Item = PaymasterEntry>) -> Self {
        Self {
            paymasters: entries
                .into_iter()
                .map(|entry| ((entry.entry_point, entry.chain_id), entry.address))
                .collect(),
        }
    }

    /// Returns the paymaster deployed for `entry_point` on `chain_id`.
    pub fn paymaster(&self, entry_point: EntryPointVersion, chain_id: u64) -> Option<Address> {
        self.paymasters.get(&(entry_point, chain_id)).copied()
    }

    pub fn len(&self) -> usize {
        self.paymasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paymasters.is_empty()
    }
}
