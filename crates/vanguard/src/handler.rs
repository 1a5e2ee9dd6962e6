use eyre::{Chain, EyreHandler};
use itertools::Itertools;
use std::{error::Error, fmt};
use vanguard_account::{AccountError, StatusMessage};
use vanguard_common::errors::{dedup_chain, entry_point_code};
use vanguard_config::ConfigError;
use vanguard_wallets::WalletError;

/// A console action that ended without an informational status.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    NotReady(String),
    #[error("{0}")]
    Failed(String),
}

impl ActionError {
    /// Returns the message of an informational status, or the status as an error.
    pub fn check(status: StatusMessage) -> Result<String, Self> {
        match status {
            StatusMessage::Info(msg) => Ok(msg),
            StatusMessage::NotReady(msg) => Err(Self::NotReady(msg)),
            StatusMessage::Failed(msg) => Err(Self::Failed(msg)),
        }
    }
}

const LOGIN_HINT: &str = "log in with `--private-key` or `--mnemonic`; the smart account is \
                          bootstrapped right after login";

/// What the user can do about `error`, looking through its whole chain.
pub fn hint(error: &(dyn Error + 'static)) -> Option<&'static str> {
    Chain::new(error)
        .find_map(|cause| {
            if let Some(err) = cause.downcast_ref::<AccountError>() {
                account_hint(err)
            } else if let Some(err) = cause.downcast_ref::<WalletError>() {
                wallet_hint(err)
            } else if let Some(err) = cause.downcast_ref::<ConfigError>() {
                config_hint(err)
            } else if let Some(ActionError::NotReady(_)) = cause.downcast_ref::<ActionError>() {
                Some(LOGIN_HINT)
            } else {
                None
            }
        })
        .or_else(|| entry_point_code(error).and_then(|code| entry_point_hint(&code)))
}

fn entry_point_hint(code: &str) -> Option<&'static str> {
    match code.get(..3)? {
        "AA1" => Some("the account could not be deployed; check `factory` in vanguard.toml"),
        "AA2" => Some("fund the smart account or configure a paymaster for this chain"),
        "AA3" => Some("the paymaster refused the operation; run `vanguard paymaster-status`"),
        _ => None,
    }
}

fn account_hint(err: &AccountError) -> Option<&'static str> {
    match err {
        AccountError::NotReady => Some(LOGIN_HINT),
        AccountError::UnsupportedEntryPoint(_) => {
            Some("set `entry_point = \"v0.7\"` in vanguard.toml")
        }
        AccountError::ClientBuild(_) => Some("check `bundler_url` or `--bundler-url`"),
        AccountError::Wallet(err) => wallet_hint(err),
        AccountError::Config(err) => config_hint(err),
        _ => None,
    }
}

fn wallet_hint(err: &WalletError) -> Option<&'static str> {
    match err {
        WalletError::Rejected { .. } => Some("approve the request in the wallet and retry"),
        WalletError::NotConnected | WalletError::NoAccounts => Some(LOGIN_HINT),
        _ => None,
    }
}

fn config_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::UnknownChain(_) => Some("run `vanguard chains` for the known ids"),
        ConfigError::MissingRpcUrl(_) => {
            Some("add an http url under `rpc_urls` for the chain in vanguard.toml")
        }
        _ => None,
    }
}

/// Error reporting for the `vanguard` binary.
///
/// Prints the deduplicated error chain followed by a hint when one applies, or the full
/// `color-eyre` report with `VANGUARD_DEBUG` set.
pub struct Handler {
    debug_handler: Option<Box<dyn EyreHandler>>,
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        dedup_chain(error).into_iter().format("; ").fmt(f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(debug_handler) = &self.debug_handler {
            return debug_handler.debug(error, f);
        }

        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let errors = dedup_chain(error);
        let Some((first, sources)) = errors.split_first() else { return Ok(()) };
        write!(f, "{first}")?;

        if !sources.is_empty() {
            write!(f, "\n\nContext:")?;
            for source in sources {
                write!(f, "\n- {source}")?;
            }
        }

        if let Some(hint) = hint(error) {
            write!(f, "\n\nHint: {hint}")?;
        }

        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(debug_handler) = &mut self.debug_handler {
            debug_handler.track_caller(location);
        }
    }
}

/// Installs the [`eyre`] and panic hooks.
///
/// `VANGUARD_DEBUG` switches error reports to the `color-eyre` debug handler. Panics always go
/// through `color-eyre`.
pub fn install() {
    let panic_section = "This is a bug in vanguard. Rerun with `RUST_BACKTRACE=1` and \
                         `RUST_LOG=vanguard_account=debug` and include the output when \
                         reporting it.";
    let (panic_hook, debug_hook) =
        color_eyre::config::HookBuilder::default().panic_section(panic_section).into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let debug = std::env::var_os("VANGUARD_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler { debug_handler: debug.then(|| debug_hook(e)) })
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}
