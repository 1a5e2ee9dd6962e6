//! Bootstrap against HTTP endpoints

use crate::utils::{API_KEY, MockNode, RECIPIENT, TEAM};
use alloy_primitives::{Bytes, U256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use std::sync::Arc;
use vanguard_account::{Bootstrapper, HttpConnector, Session};
use vanguard_config::{ENTRY_POINT_V07, VANAR_TESTNET};
use vanguard_wallets::{Eip1193Provider, LocalKeyProvider};

fn provider(key: &PrivateKeySigner) -> Arc<dyn Eip1193Provider> {
    Arc::new(LocalKeyProvider::new(key.clone(), VANAR_TESTNET))
}

fn session(node: &MockNode) -> Session {
    crate::init_tracing();
    Session::new(Bootstrapper::new(node.bootstrap_config(), Arc::new(HttpConnector::default())))
}

#[tokio::test(flavor = "multi_thread")]
async fn send_before_bootstrap_makes_no_request() {
    let node = MockNode::spawn().await;
    let session = session(&node);

    let hash = session.send_transaction(RECIPIENT, U256::ZERO, Bytes::new()).await.unwrap();
    assert!(hash.is_none());
    assert!(node.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_and_send() {
    let node = MockNode::spawn().await;
    let session = session(&node);
    let key = PrivateKeySigner::random();

    assert!(session.connect(provider(&key)).await.unwrap());
    let bootstrapped = session.bootstrapped().unwrap();
    assert_eq!(bootstrapped.signer.address(), key.address());
    assert_eq!(bootstrapped.descriptor.address, MockNode::account_for(key.address(), U256::ZERO));
    // the pipeline only resolves the address, clients are built without requests
    assert_eq!(node.methods(), vec!["eth_call"]);

    let hash = session.send_transaction(RECIPIENT, U256::ZERO, Bytes::new()).await.unwrap();
    let hash = hash.unwrap();
    let hex = hash.to_string();
    assert_eq!(hex.len(), 66);
    assert!(hex.starts_with("0x"));

    let ops = node.user_ops();
    assert_eq!(ops.len(), 1);
    let op = &ops[0];
    assert_eq!(op.sender, bootstrapped.descriptor.address);
    assert_eq!(hash, op.hash(ENTRY_POINT_V07, VANAR_TESTNET));
    assert_eq!(op.max_fee_per_gas, U256::from(1_000_000_000u64));
    assert_eq!(op.max_priority_fee_per_gas, U256::from(1_000_000_000u64));
    assert_eq!(op.paymaster, Some(crate::utils::PAYMASTER));
    assert!(op.factory.is_some(), "undeployed account must carry init code");

    // sponsorship is requested before any paymaster field is set
    let requests = node.requests();
    let sponsor = requests.iter().find(|r| r.method == "pm_sponsorUserOperation").unwrap();
    assert!(sponsor.params[0].get("paymaster").is_none());
    assert!(sponsor.params[0].get("paymasterVerificationGasLimit").is_none());
    assert!(sponsor.params[0].get("paymasterPostOpGasLimit").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn api_key_and_headers_reach_bundler_and_paymaster() {
    let node = MockNode::spawn().await;
    let session = session(&node);
    session.connect(provider(&PrivateKeySigner::random())).await.unwrap();
    session.send_transaction(RECIPIENT, U256::ZERO, Bytes::new()).await.unwrap();

    let requests = node.requests();
    let service = requests
        .iter()
        .filter(|r| r.method.starts_with("pm_") || r.method.contains("UserOperation"))
        .collect::<Vec<_>>();
    assert_eq!(service.len(), 2);
    for request in service {
        assert_eq!(request.api_key.as_deref(), Some(API_KEY), "{}", request.method);
        assert_eq!(request.team.as_deref(), Some(TEAM), "{}", request.method);
    }
    let chain_rpc = requests
        .iter()
        .filter(|r| r.method.starts_with("eth_") && !r.method.contains("UserOperation"));
    for request in chain_rpc {
        assert_eq!(request.api_key, None, "{}", request.method);
        assert_eq!(request.team, None, "{}", request.method);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn address_is_stable_across_bootstraps() {
    let node = MockNode::spawn().await;
    let session = session(&node);
    let key = PrivateKeySigner::random();

    session.connect(provider(&key)).await.unwrap();
    let first = session.bootstrapped().unwrap().descriptor.clone();
    session.connect(provider(&key)).await.unwrap();
    let second = session.bootstrapped().unwrap().descriptor.clone();
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_clears_session() {
    let node = MockNode::spawn().await;
    let session = session(&node);
    let mut rx = session.subscribe();
    session.connect(provider(&PrivateKeySigner::random())).await.unwrap();
    assert!(rx.borrow_and_update().is_bootstrapped());

    session.clear();
    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().is_bootstrapped());
    assert!(session.provider().is_none());

    let before = node.requests().len();
    assert!(session.send_transaction(RECIPIENT, U256::ZERO, Bytes::new()).await.unwrap().is_none());
    assert_eq!(node.requests().len(), before);
}
