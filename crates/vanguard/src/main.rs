#[macro_use]
extern crate tracing;

use clap::Parser;
use eyre::Result;
use std::sync::Arc;
use vanguard_account::{BootstrapConfig, Bootstrapper, Console, HttpConnector, Session};
use vanguard_config::Config;
use vanguard_wallets::{LocalAuthClient, RawWallet};

mod args;
mod handler;
mod utils;

use args::{Vanguard, VanguardSubcommand};
use handler::ActionError;

fn main() -> Result<()> {
    handler::install();
    utils::subscriber();
    utils::load_dotenv();
    let args = Vanguard::parse();
    run(args)
}

#[tokio::main(flavor = "current_thread")]
async fn run(args: Vanguard) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(chain) = args.chain {
        config.chain_id = chain;
    }
    if let Some(url) = args.bundler_url {
        config.bundler_url = url;
    }
    if let Some(entry_point) = args.entry_point {
        config.entry_point = entry_point;
    }
    config.bundler_headers.extend(args.bundler_headers);
    trace!(chain_id = config.chain_id, bundler_url = %config.bundler_url, "loaded config");

    let cmd = match args.cmd {
        VanguardSubcommand::Chains => {
            for chain in config.chain_table().iter() {
                let rpc = chain.rpc_url().unwrap_or("-");
                let symbol = &chain.native_currency.symbol;
                println!("{:>8}  {:<28} {symbol:<6} {rpc}", chain.id, chain.name);
            }
            return Ok(());
        }
        cmd => cmd,
    };

    let console = console(&config, &args.wallet)?;
    ActionError::check(console.init().await)?;
    ActionError::check(console.login().await)?;

    let status = match cmd {
        VanguardSubcommand::Chains => return Ok(()),
        VanguardSubcommand::Accounts => console.get_accounts().await,
        VanguardSubcommand::Address => console.address(),
        VanguardSubcommand::Balance => console.get_balance().await,
        VanguardSubcommand::Send { to, value, data } => {
            console.send_transaction(to, value, data).await
        }
        VanguardSubcommand::Mint { contract, to, amount } => {
            let to = match to {
                Some(to) => to,
                None => console.session().require_client()?.address(),
            };
            console.mint(contract, to, amount).await
        }
        VanguardSubcommand::SignMessage { message } => {
            console.sign_message(message.as_bytes()).await
        }
        VanguardSubcommand::Receipt { hash } => console.user_operation_receipt(hash).await,
        VanguardSubcommand::PaymasterStatus => console.paymaster_status().await,
    };

    println!("{}", ActionError::check(status)?);
    Ok(())
}

/// Wires the auth client, the session and the console from `config`.
fn console(config: &Config, wallet: &RawWallet) -> Result<Console> {
    let key = wallet.signer()?;
    let bootstrap = BootstrapConfig::from_config(config)?;
    let auth =
        Arc::new(LocalAuthClient::new(config.auth_client_id.clone(), key, bootstrap.chain.id));
    let session = Session::new(Bootstrapper::new(bootstrap, Arc::new(HttpConnector::default())));
    Ok(Console::new(auth, session, config.contract_table(), config.min_paymaster_balance))
}
