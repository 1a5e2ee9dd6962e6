use alloy_primitives::{Address, B256, Bytes, U256};
use clap::{Parser, Subcommand};
use vanguard_config::EntryPointVersion;
use vanguard_wallets::RawWallet;

/// Log in and drive an ERC-4337 smart account.
#[derive(Debug, Parser)]
#[command(name = "vanguard", version, next_display_order = None)]
pub struct Vanguard {
    /// Chain id of the smart account. Overrides `chain_id` from the config.
    #[arg(long, global = true, value_name = "CHAIN_ID")]
    pub chain: Option<u64>,

    /// Bundler and paymaster service url. Overrides `bundler_url` from the config.
    #[arg(long, global = true, value_name = "URL")]
    pub bundler_url: Option<String>,

    /// Extra headers for bundler and paymaster requests, in `name: value` form.
    ///
    /// Appended to `bundler_headers` from the config.
    #[arg(long, global = true, value_name = "HEADERS", value_delimiter = ',')]
    pub bundler_headers: Vec<String>,

    /// Entry point version. Overrides `entry_point` from the config.
    #[arg(long, global = true, value_name = "VERSION")]
    pub entry_point: Option<EntryPointVersion>,

    #[command(flatten)]
    pub wallet: RawWallet,

    #[command(subcommand)]
    pub cmd: VanguardSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum VanguardSubcommand {
    /// Lists the known chains.
    Chains,

    /// Prints the owner account of the logged in wallet and the smart account.
    #[command(visible_alias = "a")]
    Accounts,

    /// Prints the smart account address.
    Address,

    /// Prints the native balance of the smart account.
    #[command(visible_alias = "b")]
    Balance,

    /// Sends a transaction from the smart account through the bundler.
    #[command(visible_alias = "s")]
    Send {
        /// The recipient.
        #[arg(long)]
        to: Address,

        /// Value in wei.
        #[arg(long, default_value = "0")]
        value: U256,

        /// Calldata.
        #[arg(long, default_value = "0x")]
        data: Bytes,
    },

    /// Calls `mint(to, amount)` on a token contract from the smart account.
    Mint {
        /// The token contract.
        #[arg(long)]
        contract: Address,

        /// The receiver of the minted tokens. Defaults to the smart account.
        #[arg(long)]
        to: Option<Address>,

        #[arg(long)]
        amount: U256,
    },

    /// Signs a message with the owner account.
    SignMessage {
        message: String,
    },

    /// Looks up the receipt of a user operation.
    Receipt {
        hash: B256,
    },

    /// Checks the entry point deposit of the configured paymaster.
    PaymasterStatus,
}
