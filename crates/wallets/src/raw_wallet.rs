use crate::{
    WalletError,
    utils::{create_mnemonic_signer, create_private_key_signer},
};
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;

/// Key material for the local auth client.
///
/// The key can either be:
/// 1. Private Key (cleartext in CLI or `VANGUARD_PRIVATE_KEY`)
/// 2. Mnemonic (phrase or file path)
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Wallet options", about = None, long_about = None)]
pub struct RawWallet {
    /// Use the provided private key.
    #[arg(
        long,
        value_name = "RAW_PRIVATE_KEY",
        env = "VANGUARD_PRIVATE_KEY",
        hide_env_values = true
    )]
    pub private_key: Option<String>,

    /// Use the mnemonic phrase of mnemonic file at the specified path.
    #[arg(long, alias = "mnemonic-path", conflicts_with = "private_key")]
    pub mnemonic: Option<String>,

    /// Use a BIP39 passphrase for the mnemonic.
    #[arg(long, value_name = "PASSPHRASE")]
    pub mnemonic_passphrase: Option<String>,

    /// The wallet derivation path.
    #[arg(long = "mnemonic-derivation-path", alias = "hd-path", value_name = "PATH")]
    pub hd_path: Option<String>,

    /// Use the private key from the given mnemonic index.
    #[arg(long, conflicts_with = "hd_path", default_value_t = 0, value_name = "INDEX")]
    pub mnemonic_index: u32,
}

impl RawWallet {
    /// Resolves the configured key, if any.
    pub fn signer(&self) -> Result<Option<PrivateKeySigner>, WalletError> {
        if let Some(private_key) = &self.private_key {
            return create_private_key_signer(private_key).map(Some);
        }
        if let Some(mnemonic) = &self.mnemonic {
            return create_mnemonic_signer(
                mnemonic,
                self.mnemonic_passphrase.as_deref(),
                self.hd_path.as_deref(),
                self.mnemonic_index,
            )
            .map(Some);
        }
        Ok(None)
    }
}
