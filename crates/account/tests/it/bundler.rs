//! Bundler and paymaster clients against a mock service

use crate::utils::{API_KEY, MockNode, PAYMASTER};
use alloy_primitives::{Address, B256, U256};
use vanguard_account::{
    BundlerClient, HttpBundlerClient, HttpPaymasterClient, PaymasterClient, UserOperation,
};
use vanguard_common::ProviderBuilder;
use vanguard_config::{ENTRY_POINT_V07, GasFees, UserOperationDefaults, VANAR_TESTNET};

fn op() -> UserOperation {
    UserOperation::new(
        Address::repeat_byte(0x11),
        U256::ZERO,
        Default::default(),
        GasFees::default(),
        &UserOperationDefaults::default(),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn bundler_methods() {
    let node = MockNode::spawn().await;
    let client = ProviderBuilder::new(&node.url).api_key(Some(API_KEY)).build_client().unwrap();
    let bundler = HttpBundlerClient::new(client, ENTRY_POINT_V07);

    assert_eq!(bundler.supported_entry_points().await.unwrap(), vec![ENTRY_POINT_V07]);
    assert!(bundler.user_operation_receipt(B256::ZERO).await.unwrap().is_none());

    let estimate = bundler.estimate_user_operation_gas(&op()).await.unwrap();
    assert_eq!(estimate.call_gas_limit, U256::from(200_000));

    let hash = bundler.send_user_operation(&op()).await.unwrap();
    assert_eq!(hash, op().hash(ENTRY_POINT_V07, VANAR_TESTNET));

    let methods = node.methods();
    assert_eq!(
        methods,
        vec![
            "eth_supportedEntryPoints",
            "eth_getUserOperationReceipt",
            "eth_estimateUserOperationGas",
            "eth_sendUserOperation",
        ]
    );
    let send = node.requests().pop().unwrap();
    assert_eq!(send.params[1], serde_json::json!(ENTRY_POINT_V07));
    assert_eq!(send.params[0]["maxFeePerGas"], "0x3b9aca00");
}

#[tokio::test(flavor = "multi_thread")]
async fn paymaster_sponsors() {
    let node = MockNode::spawn().await;
    let client = ProviderBuilder::new(&node.url).api_key(Some(API_KEY)).build_client().unwrap();
    let paymaster = HttpPaymasterClient::new(client, VANAR_TESTNET);

    let result = paymaster.sponsor_user_operation(&op(), ENTRY_POINT_V07).await.unwrap();
    assert_eq!(result.paymaster, PAYMASTER);
    assert_eq!(result.paymaster_verification_gas_limit, U256::from(100_000));

    let mut op = op();
    result.apply(&mut op);
    assert!(op.is_sponsored());
    assert_eq!(node.requests()[0].api_key.as_deref(), Some(API_KEY));
}

#[tokio::test(flavor = "multi_thread")]
async fn paymaster_rejects_limits_without_paymaster() {
    let node = MockNode::spawn().await;
    let client = ProviderBuilder::new(&node.url).build_client().unwrap();
    let paymaster = HttpPaymasterClient::new(client, VANAR_TESTNET);

    let mut op = op();
    op.paymaster_verification_gas_limit = Some(U256::from(100_000));
    let err = paymaster.sponsor_user_operation(&op, ENTRY_POINT_V07).await.unwrap_err();
    assert!(err.to_string().contains("without paymaster"), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn rpc_errors_surface() {
    let node = MockNode::spawn().await;
    let client = ProviderBuilder::new(&node.url).build_client().unwrap();
    let result: Result<U256, _> = client.request_noparams("eth_unknownMethod").await;
    assert!(result.is_err());
}
