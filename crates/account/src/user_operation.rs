//! ERC-4337 v0.7 user operations.

use alloy_primitives::{Address, B256, Bytes, U256, bytes, keccak256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use vanguard_config::{GasFees, UserOperationDefaults};

/// Placeholder signature of the right shape for gas estimation and sponsorship.
///
/// Recovers to some address without reverting, so account validation runs its full code path.
pub const DUMMY_SIGNATURE: Bytes = bytes!(
    "fffffffffffffffffffffffffffffff0000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c"
);

/// A v0.7 user operation in the unpacked form bundler RPCs accept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    pub sender: Address,
    pub nonce: U256,
    /// Set only while the account is not deployed yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_data: Option<Bytes>,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_verification_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_post_op_gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_data: Option<Bytes>,
    pub signature: Bytes,
}

impl UserOperation {
    /// Creates an unsigned operation with default gas limits and the given fees.
    pub fn new(
        sender: Address,
        nonce: U256,
        call_data: Bytes,
        fees: GasFees,
        defaults: &UserOperationDefaults,
    ) -> Self {
        Self {
            sender,
            nonce,
            call_data,
            call_gas_limit: U256::from(defaults.call_gas_limit),
            verification_gas_limit: U256::from(defaults.verification_gas_limit),
            pre_verification_gas: U256::from(defaults.pre_verification_gas),
            max_fee_per_gas: U256::from(fees.max_fee_per_gas),
            max_priority_fee_per_gas: U256::from(fees.max_priority_fee_per_gas),
            signature: DUMMY_SIGNATURE,
            ..Default::default()
        }
    }

    /// `factory ++ factoryData`, empty when the account already exists.
    pub fn init_code(&self) -> Bytes {
        match (&self.factory, &self.factory_data) {
            (Some(factory), data) => {
                let mut out = factory.to_vec();
                if let Some(data) = data {
                    out.extend_from_slice(data);
                }
                out.into()
            }
            (None, _) => Bytes::new(),
        }
    }

    /// `verificationGasLimit ++ callGasLimit`, 16 bytes each.
    pub fn account_gas_limits(&self) -> B256 {
        pack_u128_pair(self.verification_gas_limit, self.call_gas_limit)
    }

    /// `maxPriorityFeePerGas ++ maxFeePerGas`, 16 bytes each.
    pub fn gas_fees(&self) -> B256 {
        pack_u128_pair(self.max_priority_fee_per_gas, self.max_fee_per_gas)
    }

    /// `paymaster ++ verificationGasLimit ++ postOpGasLimit ++ paymasterData`, empty without a
    /// paymaster.
    pub fn paymaster_and_data(&self) -> Bytes {
        let Some(paymaster) = self.paymaster else { return Bytes::new() };
        let mut out = paymaster.to_vec();
        out.extend_from_slice(&low_u128_bytes(
            self.paymaster_verification_gas_limit.unwrap_or_default(),
        ));
        out.extend_from_slice(&low_u128_bytes(
            self.paymaster_post_op_gas_limit.unwrap_or_default(),
        ));
        if let Some(data) = &self.paymaster_data {
            out.extend_from_slice(data);
        }
        out.into()
    }

    /// The hash the account owner signs.
    ///
    /// `keccak256(abi.encode(keccak256(pack(op)), entryPoint, chainId))` where `pack` hashes the
    /// dynamic fields and leaves out the signature.
    pub fn hash(&self, entry_point: Address, chain_id: u64) -> B256 {
        let packed = (
            self.sender,
            self.nonce,
            keccak256(self.init_code()),
            keccak256(&self.call_data),
            self.account_gas_limits(),
            self.pre_verification_gas,
            self.gas_fees(),
            keccak256(self.paymaster_and_data()),
        )
            .abi_encode();
        keccak256((keccak256(packed), entry_point, U256::from(chain_id)).abi_encode())
    }

    /// Whether the operation carries paymaster fields.
    pub fn is_sponsored(&self) -> bool {
        self.paymaster.is_some()
    }
}

fn low_u128_bytes(value: U256) -> [u8; 16] {
    let word = value.to_be_bytes::<32>();
    let mut out = [0u8; 16];
    out.copy_from_slice(&word[16..]);
    out
}

fn pack_u128_pair(high: U256, low: U256) -> B256 {
    let mut out = [0u8; 32];
    out[..16].copy_from_slice(&low_u128_bytes(high));
    out[16..].copy_from_slice(&low_u128_bytes(low));
    B256::from(out)
}
