//! Contract interfaces the smart account talks to.

use crate::{ChainClient, Result};
use alloy_primitives::{Address, U256, aliases::U192};
use alloy_sol_types::{SolCall, sol};

sol! {
    /// eth-infinitism `SimpleAccountFactory`.
    interface ISimpleAccountFactory {
        function createAccount(address owner, uint256 salt) external returns (address ret);
        function getAddress(address owner, uint256 salt) external view returns (address);
    }

    /// eth-infinitism `SimpleAccount`.
    interface ISimpleAccount {
        function execute(address dest, uint256 value, bytes calldata func) external;
        function executeBatch(
            address[] calldata dest,
            uint256[] calldata value,
            bytes[] calldata func
        ) external;
    }

    /// The parts of `EntryPoint` (and its `StakeManager`) used here.
    interface IEntryPoint {
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce);
        function balanceOf(address account) external view returns (uint256);
    }

    /// A mintable token, as used by the demo mint action.
    interface IMintable {
        function mint(address to, uint256 amount) external;
    }
}

/// Reads the next nonce of `sender` for the default key from the entry point.
pub async fn entry_point_nonce(
    chain: &dyn ChainClient,
    entry_point: Address,
    sender: Address,
) -> Result<U256> {
    let call = IEntryPoint::getNonceCall { sender, key: U192::ZERO };
    let ret = chain.call(entry_point, call.abi_encode().into()).await?;
    Ok(IEntryPoint::getNonceCall::abi_decode_returns(&ret)?)
}

/// Reads the deposit `account` holds at the entry point.
pub async fn entry_point_deposit(
    chain: &dyn ChainClient,
    entry_point: Address,
    account: Address,
) -> Result<U256> {
    let call = IEntryPoint::balanceOfCall { account };
    let ret = chain.call(entry_point, call.abi_encode().into()).await?;
    Ok(IEntryPoint::balanceOfCall::abi_decode_returns(&ret)?)
}
