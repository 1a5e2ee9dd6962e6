//! Console actions end to end

use crate::utils::{MockNode, RECIPIENT};
use alloy_primitives::{Bytes, U256};
use alloy_signer_local::PrivateKeySigner;
use std::sync::Arc;
use vanguard_account::{Bootstrapper, Console, HttpConnector, Session, StatusMessage};
use vanguard_config::{ContractAddressTable, MIN_PAYMASTER_BALANCE, VANAR_TESTNET};
use vanguard_wallets::LocalAuthClient;

fn console(node: &MockNode, key: Option<PrivateKeySigner>) -> Console {
    crate::init_tracing();
    let bootstrapper =
        Bootstrapper::new(node.bootstrap_config(), Arc::new(HttpConnector::default()));
    let session = Session::new(bootstrapper);
    let auth = Arc::new(LocalAuthClient::new(Some("client-id".into()), key, VANAR_TESTNET));
    Console::new(auth, session, ContractAddressTable::default(), MIN_PAYMASTER_BALANCE)
}

#[tokio::test(flavor = "multi_thread")]
async fn balance_before_login() {
    let node = MockNode::spawn().await;
    let console = console(&node, Some(PrivateKeySigner::random()));
    console.init().await;

    let status = console.get_balance().await;
    assert_eq!(status, StatusMessage::NotReady("provider not initialized yet".into()));
    assert!(node.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn login_balance_send_logout() {
    let node = MockNode::spawn().await;
    let console = console(&node, Some(PrivateKeySigner::random()));
    console.init().await;
    assert!(console.login().await.is_ok());

    assert_eq!(
        console.get_balance().await,
        StatusMessage::Info("1.000000000000000000 VANRY".into())
    );
    assert!(console.send_transaction(RECIPIENT, U256::ZERO, Bytes::new()).await.is_ok());
    assert_eq!(node.user_ops().len(), 1);

    // no paymaster deployment is configured for the chain
    assert!(matches!(console.paymaster_status().await, StatusMessage::Failed(_)));

    assert!(console.logout().await.is_ok());
    assert!(!console.send_transaction(RECIPIENT, U256::ZERO, Bytes::new()).await.is_ok());
    assert_eq!(node.user_ops().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn login_without_key_fails() {
    let node = MockNode::spawn().await;
    let console = console(&node, None);
    console.init().await;
    let status = console.login().await;
    assert!(matches!(status, StatusMessage::Failed(_)), "{status}");
    assert!(!console.logged_in());
    assert!(node.requests().is_empty());
}
