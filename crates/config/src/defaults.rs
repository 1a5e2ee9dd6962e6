//! Default user operation values.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Hosted bundler and paymaster service for the Vanar testnet.
pub const DEFAULT_BUNDLER_URL: &str = "https://vanar-testnet.jiffyscan.xyz";

/// Flat `maxFeePerGas` applied to every user operation: 1 gwei.
pub const DEFAULT_MAX_FEE_PER_GAS: u128 = 1_000_000_000;

/// Flat `maxPriorityFeePerGas` applied to every user operation: 1 gwei.
pub const DEFAULT_MAX_PRIORITY_FEE_PER_GAS: u128 = 1_000_000_000;

/// Minimum entry point deposit a paymaster should hold: 0.1 native token.
pub const MIN_PAYMASTER_BALANCE: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

/// Gas price parameters of a user operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasFees {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

impl Default for GasFees {
    fn default() -> Self {
        Self {
            max_fee_per_gas: DEFAULT_MAX_FEE_PER_GAS,
            max_priority_fee_per_gas: DEFAULT_MAX_PRIORITY_FEE_PER_GAS,
        }
    }
}

/// Gas limits used until the bundler or paymaster provides better ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOperationDefaults {
    pub call_gas_limit: u128,
    pub verification_gas_limit: u128,
    pub pre_verification_gas: u128,
}

impl Default for UserOperationDefaults {
    fn default() -> Self {
        Self {
            call_gas_limit: 200_000,
            verification_gas_limit: 500_000,
            pre_verification_gas: 60_000,
        }
    }
}
