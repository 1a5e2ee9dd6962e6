//! A mock node answering chain, bundler and paymaster JSON-RPC on one endpoint.

use alloy_primitives::{Address, Bytes, U256, address, hex, keccak256};
use alloy_sol_types::{SolCall, SolValue};
use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::task::JoinHandle;
use vanguard_account::{
    BootstrapConfig, UserOperation,
    contracts::{IEntryPoint, ISimpleAccountFactory},
};
use vanguard_config::{ChainConfig, VANAR_TESTNET};

pub const API_KEY: &str = "test-api-key";
pub const TEAM: &str = "vanguard-tests";
pub const RECIPIENT: Address = address!("0x0B3074cd5891526420d493B13439f3d4b8be6144");
pub const PAYMASTER: Address = address!("0x00000000000000000000000000000000000000aa");

/// One request seen by the mock node.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: String,
    pub api_key: Option<String>,
    /// The `x-team` header, set through the configured bundler headers.
    pub team: Option<String>,
    pub params: Value,
}

#[derive(Debug, Default)]
struct Recorded {
    requests: Vec<Request>,
    user_ops: Vec<UserOperation>,
}

type Shared = Arc<Mutex<Recorded>>;

pub struct MockNode {
    pub url: String,
    recorded: Shared,
    handle: JoinHandle<()>,
}

impl Drop for MockNode {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockNode {
    pub async fn spawn() -> Self {
        let recorded = Shared::default();
        let app = Router::new().route("/", post(handle)).with_state(recorded.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { url: format!("http://{addr}"), recorded, handle }
    }

    /// Vanar testnet with both the chain RPC and the bundler service pointed at this node.
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        let mut chain = ChainConfig::vanar_testnet();
        chain.rpc_urls.http = vec![self.url.clone()];
        BootstrapConfig {
            chain,
            bundler_url: self.url.clone(),
            api_key: Some(API_KEY.to_string()),
            headers: vec![format!("x-team: {TEAM}")],
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.recorded.lock().requests.clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.method).collect()
    }

    pub fn user_ops(&self) -> Vec<UserOperation> {
        self.recorded.lock().user_ops.clone()
    }

    /// The address the mock factory reports for `owner` and `salt`.
    pub fn account_for(owner: Address, salt: U256) -> Address {
        Address::from_word(keccak256((owner, salt).abi_encode()))
    }
}

async fn handle(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<Value>,
) -> Json<Value> {
    let method = req["method"].as_str().unwrap_or_default().to_string();
    let params = req["params"].clone();
    let header = |name| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    let (api_key, team) = (header("x-api-key"), header("x-team"));
    let request = Request { method: method.clone(), api_key, team, params: params.clone() };
    recorded.lock().requests.push(request);

    let result = match method.as_str() {
        "eth_chainId" => Ok(json!(format!("{VANAR_TESTNET:#x}"))),
        "eth_getCode" => Ok(json!("0x")),
        "eth_getBalance" => Ok(json!("0xde0b6b3a7640000")),
        "eth_call" => eth_call(&params[0]),
        "eth_supportedEntryPoints" => Ok(json!([vanguard_config::ENTRY_POINT_V07])),
        "eth_estimateUserOperationGas" => Ok(json!({
            "preVerificationGas": "0xea60",
            "verificationGasLimit": "0x7a120",
            "callGasLimit": "0x30d40"
        })),
        "pm_sponsorUserOperation" => sponsor(&params[0]),
        "eth_sendUserOperation" => {
            let op: UserOperation = serde_json::from_value(params[0].clone()).unwrap();
            let entry_point: Address = serde_json::from_value(params[1].clone()).unwrap();
            let hash = op.hash(entry_point, VANAR_TESTNET);
            recorded.lock().user_ops.push(op);
            Ok(json!(hash))
        }
        "eth_getUserOperationReceipt" => Ok(Value::Null),
        _ => Err(json!({ "code": -32601, "message": format!("method not found: {method}") })),
    };

    Json(match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": req["id"], "result": result }),
        Err(error) => json!({ "jsonrpc": "2.0", "id": req["id"], "error": error }),
    })
}

fn sponsor(op: &Value) -> Result<Value, Value> {
    let orphaned = op.get("paymasterVerificationGasLimit").is_some()
        || op.get("paymasterPostOpGasLimit").is_some();
    if op.get("paymaster").is_none() && orphaned {
        return Err(json!({ "code": -32602, "message": "paymaster gas limits without paymaster" }));
    }
    Ok(json!({
        "paymaster": PAYMASTER,
        "paymasterData": "0x",
        "paymasterVerificationGasLimit": "0x186a0",
        "paymasterPostOpGasLimit": "0xc350"
    }))
}

fn eth_call(tx: &Value) -> Result<Value, Value> {
    let input = tx.get("input").or_else(|| tx.get("data")).and_then(Value::as_str).unwrap_or("0x");
    let input = Bytes::from(hex::decode(input).unwrap());
    let selector = input.get(..4).unwrap_or_default();

    let ret = if selector == ISimpleAccountFactory::getAddressCall::SELECTOR.as_slice() {
        let call = ISimpleAccountFactory::getAddressCall::abi_decode(&input).unwrap();
        MockNode::account_for(call.owner, call.salt).abi_encode()
    } else if selector == IEntryPoint::getNonceCall::SELECTOR.as_slice() {
        U256::ZERO.abi_encode()
    } else if selector == IEntryPoint::balanceOfCall::SELECTOR.as_slice() {
        U256::from(10).pow(U256::from(18)).abi_encode()
    } else {
        return Err(json!({ "code": 3, "message": "execution reverted" }));
    };
    Ok(json!(hex::encode_prefixed(ret)))
}
