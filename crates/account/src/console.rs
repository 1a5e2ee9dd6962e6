//! User-facing actions over an auth client and a [`Session`].

use crate::{
    Session,
    contracts::{IMintable, entry_point_deposit},
};
use alloy_primitives::{Address, B256, Bytes, U256, hex, utils::format_ether};
use alloy_signer::Signer;
use alloy_sol_types::SolCall;
use std::{error::Error, fmt, sync::Arc};
use vanguard_common::errors::display_chain;
use vanguard_config::ContractAddressTable;
use vanguard_wallets::{AuthClient, Eip1193Provider};

/// Outcome of a console action, meant to be shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    /// The action needs a login or a finished bootstrap.
    NotReady(String),
    Failed(String),
}

impl StatusMessage {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Info(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Info(msg) | Self::NotReady(msg) | Self::Failed(msg) => msg,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(msg) => write!(f, "error: {msg}"),
            Self::Info(msg) | Self::NotReady(msg) => f.write_str(msg),
        }
    }
}

pub const PROVIDER_NOT_READY: &str = "provider not initialized yet";
pub const ACCOUNT_NOT_READY: &str = "smart account not initialized yet";

fn failed(action: &str, err: impl Error + 'static) -> StatusMessage {
    let err = display_chain(&err as &(dyn Error + 'static));
    error!(action, %err, "console action failed");
    StatusMessage::Failed(format!("{action} failed: {err}"))
}

/// The demo front-end: login, account queries and smart account transactions.
///
/// Actions never fail; errors are logged and reported as [`StatusMessage::Failed`].
#[derive(Debug)]
pub struct Console {
    auth: Arc<dyn AuthClient>,
    session: Session,
    contracts: ContractAddressTable,
    min_paymaster_balance: U256,
}

impl Console {
    pub fn new(
        auth: Arc<dyn AuthClient>,
        session: Session,
        contracts: ContractAddressTable,
        min_paymaster_balance: U256,
    ) -> Self {
        Self { auth, session, contracts, min_paymaster_balance }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn logged_in(&self) -> bool {
        self.auth.connected()
    }

    /// Initializes the auth client and bootstraps a restored session, if any.
    pub async fn init(&self) -> StatusMessage {
        if let Err(err) = self.auth.initialize().await {
            return failed("init", err);
        }
        match self.auth.provider() {
            Some(provider) => self.bootstrap(provider).await,
            None => StatusMessage::Info("auth client initialized".to_string()),
        }
    }

    pub async fn login(&self) -> StatusMessage {
        let provider = match self.auth.connect().await {
            Ok(provider) => provider,
            Err(err) => return failed("login", err),
        };
        self.bootstrap(provider).await
    }

    async fn bootstrap(&self, provider: Arc<dyn Eip1193Provider>) -> StatusMessage {
        match self.session.connect(provider).await {
            Ok(true) => match self.session.bootstrapped() {
                Some(b) => StatusMessage::Info(format!("logged in as {}", b.descriptor.address)),
                None => StatusMessage::NotReady(ACCOUNT_NOT_READY.to_string()),
            },
            Ok(false) => StatusMessage::NotReady(ACCOUNT_NOT_READY.to_string()),
            Err(err) => failed("bootstrap", err),
        }
    }

    pub async fn logout(&self) -> StatusMessage {
        let result = self.auth.logout().await;
        self.session.clear();
        match result {
            Ok(()) => StatusMessage::Info("logged out".to_string()),
            Err(err) => failed("logout", err),
        }
    }

    /// The owner account of the provider and, once bootstrapped, the smart account.
    pub async fn get_accounts(&self) -> StatusMessage {
        let Some(provider) = self.session.provider() else {
            return StatusMessage::NotReady(PROVIDER_NOT_READY.to_string());
        };
        let accounts = match provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => return failed("get accounts", err),
        };
        let mut msg = accounts.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        if let Some(b) = self.session.bootstrapped() {
            msg.push_str(&format!("\nsmart account: {}", b.descriptor.address));
        }
        StatusMessage::Info(msg)
    }

    /// The smart account address, followed by its explorer link when the chain has an explorer.
    pub fn address(&self) -> StatusMessage {
        let Some(b) = self.session.bootstrapped() else {
            return StatusMessage::NotReady(ACCOUNT_NOT_READY.to_string());
        };
        let address = b.descriptor.address;
        match b.client.chain_config().explorer_address_url(&address) {
            Some(link) => StatusMessage::Info(format!("{address}\n{link}")),
            None => StatusMessage::Info(address.to_string()),
        }
    }

    /// Native balance of the smart account.
    pub async fn get_balance(&self) -> StatusMessage {
        let Some(b) = self.session.bootstrapped() else {
            return StatusMessage::NotReady(PROVIDER_NOT_READY.to_string());
        };
        match b.client.balance().await {
            Ok(balance) => {
                let symbol = &b.client.chain_config().native_currency.symbol;
                StatusMessage::Info(format!("{} {symbol}", format_ether(balance)))
            }
            Err(err) => failed("get balance", err),
        }
    }

    pub async fn send_transaction(&self, to: Address, value: U256, data: Bytes) -> StatusMessage {
        match self.session.send_transaction(to, value, data).await {
            Ok(Some(hash)) => StatusMessage::Info(format!("user operation hash: {hash}")),
            Ok(None) => StatusMessage::NotReady(ACCOUNT_NOT_READY.to_string()),
            Err(err) => failed("send transaction", err),
        }
    }

    /// An EIP-191 signature of `message` by the owner.
    pub async fn sign_message(&self, message: &[u8]) -> StatusMessage {
        let Some(b) = self.session.bootstrapped() else {
            return StatusMessage::NotReady(PROVIDER_NOT_READY.to_string());
        };
        match b.signer.sign_message(message).await {
            Ok(signature) => StatusMessage::Info(hex::encode_prefixed(signature.as_bytes())),
            Err(err) => failed("sign message", err),
        }
    }

    /// Calls `mint(to, amount)` on `contract` from the smart account.
    pub async fn mint(&self, contract: Address, to: Address, amount: U256) -> StatusMessage {
        let data = IMintable::mintCall { to, amount }.abi_encode();
        self.send_transaction(contract, U256::ZERO, data.into()).await
    }

    /// Compares the entry point deposit of the configured paymaster with the minimum balance.
    pub async fn paymaster_status(&self) -> StatusMessage {
        let Some(b) = self.session.bootstrapped() else {
            return StatusMessage::NotReady(PROVIDER_NOT_READY.to_string());
        };
        let config = self.session.config();
        let Some(paymaster) = self.contracts.paymaster(config.entry_point, config.chain.id) else {
            return StatusMessage::Failed(format!(
                "no paymaster configured for entry point {} on chain {}",
                config.entry_point, config.chain.id
            ));
        };
        let entry_point = config.entry_point.address();
        let deposit = match entry_point_deposit(b.chain.as_ref(), entry_point, paymaster).await {
            Ok(deposit) => deposit,
            Err(err) => return failed("paymaster status", err),
        };
        let verdict = if deposit >= self.min_paymaster_balance {
            "ok"
        } else {
            warn!(%paymaster, %deposit, "paymaster deposit below minimum");
            "below minimum"
        };
        StatusMessage::Info(format!(
            "paymaster {paymaster} deposit {} (minimum {}): {verdict}",
            format_ether(deposit),
            format_ether(self.min_paymaster_balance),
        ))
    }

    pub async fn user_operation_receipt(&self, hash: B256) -> StatusMessage {
        let Some(b) = self.session.bootstrapped() else {
            return StatusMessage::NotReady(PROVIDER_NOT_READY.to_string());
        };
        match b.client.user_operation_receipt(hash).await {
            Ok(Some(receipt)) => {
                let tx = receipt.receipt.as_ref().map(|r| r.transaction_hash);
                let link = tx.and_then(|tx| b.client.chain_config().explorer_tx_url(&tx));
                let mut msg = format!(
                    "user operation {hash}: success={} gas used={}",
                    receipt.success, receipt.actual_gas_used
                );
                if let Some(link) = link {
                    msg.push_str(&format!("\n{link}"));
                }
                StatusMessage::Info(msg)
            }
            Ok(None) => StatusMessage::Info(format!("user operation {hash} is pending or unknown")),
            Err(err) => failed("receipt", err),
        }
    }
}
