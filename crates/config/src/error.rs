//! Configuration errors.

use figment::providers::{Format, Toml};
use std::{collections::HashSet, error::Error, fmt};

/// Represents a failed attempt to extract `Config` from a `Figment`
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    error: figment::Error,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "failed to extract vanguard config:")?;
        let mut seen = HashSet::with_capacity(self.error.count());
        for err in self.error.clone() {
            let from_toml = err
                .metadata
                .as_ref()
                .map(|meta| meta.name.contains(Toml::NAME))
                .unwrap_or_default();
            let mut line =
                if from_toml { format!("vanguard.toml error: {err}") } else { err.to_string() };
            if !err.path.is_empty() {
                line.push_str(&format!(" for setting `{}`", err.path.join(".")));
            }
            if seen.insert(line.clone()) {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}

/// Errors produced while resolving settings out of a loaded `Config`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Extract(#[from] ExtractConfigError),
    #[error("unknown chain id {0}; add it under `[[chains]]` in vanguard.toml")]
    UnknownChain(u64),
    #[error("chain {0} has no HTTP RPC url configured")]
    MissingRpcUrl(u64),
}
