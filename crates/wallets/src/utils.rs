use crate::{WalletError, error::PrivateKeyError};
use alloy_primitives::{B256, hex::FromHex};
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English};
use std::{fs, path::Path};

fn ensure_pk_not_env(pk: &str) -> Result<(), PrivateKeyError> {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        return Err(PrivateKeyError::ExistsAsEnvVar(pk.to_string()));
    }
    Ok(())
}

/// Validates and sanitizes user inputs, returning the configured [PrivateKeySigner].
pub fn create_private_key_signer(private_key_str: &str) -> Result<PrivateKeySigner, WalletError> {
    let private_key = match B256::from_hex(private_key_str.trim()) {
        Ok(private_key) => private_key,
        Err(err) => {
            ensure_pk_not_env(private_key_str)?;
            return Err(PrivateKeyError::InvalidHex(err).into());
        }
    };
    PrivateKeySigner::from_bytes(&private_key).map_err(|err| {
        ensure_pk_not_env(private_key_str)
            .err()
            .unwrap_or_else(|| PrivateKeyError::InvalidKey(err.to_string()))
            .into()
    })
}

/// Creates a [PrivateKeySigner] from the given mnemonic parameters.
///
/// Mnemonic can be either a file path or a mnemonic phrase.
pub fn create_mnemonic_signer(
    mnemonic: &str,
    passphrase: Option<&str>,
    hd_path: Option<&str>,
    index: u32,
) -> Result<PrivateKeySigner, WalletError> {
    let mnemonic = if Path::new(mnemonic).is_file() {
        fs::read_to_string(mnemonic)?
    } else {
        mnemonic.to_owned()
    };
    let mnemonic = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut builder = MnemonicBuilder::<English>::default().phrase(mnemonic);
    builder = match hd_path {
        Some(hd_path) => builder.derivation_path(hd_path)?,
        None => builder.index(index)?,
    };
    if let Some(passphrase) = passphrase {
        builder = builder.password(passphrase);
    }
    Ok(builder.build()?)
}
