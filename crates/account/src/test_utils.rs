//! In-memory collaborators for unit tests.

use crate::{
    BootstrapConfig, BundlerClient, ChainClient, Connector, GasEstimate, PaymasterClient, Result,
    SponsorResult, UserOperation, UserOperationReceipt,
    contracts::{IEntryPoint, ISimpleAccountFactory},
};
use alloy_primitives::{Address, B256, Bytes, U256, address, keccak256};
use alloy_signer::Signature;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolValue};
use alloy_transport::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::Notify;
use vanguard_config::{ChainConfig, ENTRY_POINT_V07, VANAR_TESTNET};
use vanguard_wallets::{
    AccountSigner, Eip1193Provider, LocalKeyProvider, WalletError, provider_to_signer,
};

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub(crate) fn local_provider() -> Arc<dyn Eip1193Provider> {
    Arc::new(LocalKeyProvider::new(PrivateKeySigner::random(), VANAR_TESTNET))
}

pub(crate) async fn local_signer() -> (Arc<dyn Eip1193Provider>, AccountSigner) {
    let provider = local_provider();
    let signer = provider_to_signer(provider.clone()).await.unwrap();
    (provider, signer)
}

#[derive(Debug, Default)]
struct ChainState {
    balance: U256,
    deposit: U256,
    code: HashMap<Address, Bytes>,
}

/// Answers factory, entry point and balance queries for Vanar testnet.
#[derive(Debug)]
pub(crate) struct FakeChain {
    chain: ChainConfig,
    state: Mutex<ChainState>,
    calls: AtomicUsize,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            chain: ChainConfig::vanar_testnet(),
            state: Mutex::default(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeChain {
    /// The address the fake factory reports for `owner` and `salt`.
    pub(crate) fn account_for(owner: Address, salt: U256) -> Address {
        Address::from_word(keccak256((owner, salt).abi_encode()))
    }

    pub(crate) fn set_code(&self, address: Address, code: Bytes) {
        self.state.lock().code.insert(address, code);
    }

    pub(crate) fn set_balance(&self, balance: U256) {
        self.state.lock().balance = balance;
    }

    pub(crate) fn set_deposit(&self, deposit: U256) {
        self.state.lock().deposit = deposit;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    async fn balance(&self, _address: Address) -> Result<U256, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().balance)
    }

    async fn code(&self, address: Address) -> Result<Bytes, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().code.get(&address).cloned().unwrap_or_default())
    }

    async fn call(&self, _to: Address, input: Bytes) -> Result<Bytes, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let selector = input.get(..4).unwrap_or_default();
        let ret = if selector == ISimpleAccountFactory::getAddressCall::SELECTOR.as_slice() {
            let call = ISimpleAccountFactory::getAddressCall::abi_decode(&input)
                .map_err(TransportErrorKind::custom)?;
            Self::account_for(call.owner, call.salt).abi_encode()
        } else if selector == IEntryPoint::getNonceCall::SELECTOR.as_slice() {
            U256::ZERO.abi_encode()
        } else if selector == IEntryPoint::balanceOfCall::SELECTOR.as_slice() {
            self.state.lock().deposit.abi_encode()
        } else {
            return Err(TransportErrorKind::custom_str("execution reverted"));
        };
        Ok(ret.into())
    }
}

/// Records submitted operations and answers with their v0.7 hash.
#[derive(Debug, Default)]
pub(crate) struct FakeBundler {
    sent: Mutex<Vec<UserOperation>>,
    estimates: AtomicUsize,
}

impl FakeBundler {
    pub(crate) const ESTIMATE: U256 = U256::from_limbs([123_456, 0, 0, 0]);

    pub(crate) fn sent(&self) -> Vec<UserOperation> {
        self.sent.lock().clone()
    }

    pub(crate) fn estimates(&self) -> usize {
        self.estimates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BundlerClient for FakeBundler {
    fn entry_point(&self) -> Address {
        ENTRY_POINT_V07
    }

    async fn send_user_operation(&self, op: &UserOperation) -> Result<B256> {
        self.sent.lock().push(op.clone());
        Ok(op.hash(ENTRY_POINT_V07, VANAR_TESTNET))
    }

    async fn estimate_user_operation_gas(&self, _op: &UserOperation) -> Result<GasEstimate> {
        self.estimates.fetch_add(1, Ordering::SeqCst);
        Ok(GasEstimate {
            pre_verification_gas: Self::ESTIMATE,
            verification_gas_limit: Self::ESTIMATE,
            call_gas_limit: Self::ESTIMATE,
            paymaster_verification_gas_limit: None,
            paymaster_post_op_gas_limit: None,
        })
    }

    async fn user_operation_receipt(&self, _hash: B256) -> Result<Option<UserOperationReceipt>> {
        Ok(None)
    }

    async fn supported_entry_points(&self) -> Result<Vec<Address>> {
        Ok(vec![ENTRY_POINT_V07])
    }
}

/// Sponsors every well-formed operation.
///
/// Rejects operations carrying paymaster gas limits without a paymaster, which no v0.7 entry
/// point accepts.
#[derive(Debug, Default)]
pub(crate) struct FakePaymaster {
    seen: Mutex<Vec<UserOperation>>,
}

impl FakePaymaster {
    pub(crate) const ADDRESS: Address = address!("0x00000000000000000000000000000000000000aa");

    pub(crate) fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    /// The operations sent for sponsorship, as received.
    pub(crate) fn seen(&self) -> Vec<UserOperation> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl PaymasterClient for FakePaymaster {
    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        _entry_point: Address,
    ) -> Result<SponsorResult> {
        self.seen.lock().push(op.clone());
        let orphaned = op.paymaster_verification_gas_limit.is_some()
            || op.paymaster_post_op_gas_limit.is_some();
        if op.paymaster.is_none() && orphaned {
            let err = TransportErrorKind::custom_str("paymaster gas limits without paymaster");
            return Err(err.into());
        }
        Ok(SponsorResult {
            paymaster: Self::ADDRESS,
            paymaster_data: Bytes::from_static(&[0xbe, 0xef]),
            paymaster_verification_gas_limit: U256::from(100_000),
            paymaster_post_op_gas_limit: U256::from(50_000),
            pre_verification_gas: None,
            verification_gas_limit: None,
            call_gas_limit: None,
        })
    }
}

/// Hands out the shared fakes and counts how many clients were constructed.
#[derive(Debug, Default)]
pub(crate) struct FakeConnector {
    pub(crate) chain: Arc<FakeChain>,
    pub(crate) bundler: Arc<FakeBundler>,
    pub(crate) paymaster: Arc<FakePaymaster>,
    constructed: AtomicUsize,
}

impl FakeConnector {
    pub(crate) fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }
}

impl Connector for FakeConnector {
    fn paymaster(&self, _config: &BootstrapConfig) -> Result<Arc<dyn PaymasterClient>> {
        self.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(self.paymaster.clone())
    }

    fn bundler(&self, _config: &BootstrapConfig) -> Result<Arc<dyn BundlerClient>> {
        self.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(self.bundler.clone())
    }

    fn chain(&self, _config: &BootstrapConfig) -> Result<Arc<dyn ChainClient>> {
        self.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain.clone())
    }
}

/// A local key provider whose account request blocks until [`open`](Self::open) is called.
#[derive(Debug)]
pub(crate) struct GatedProvider {
    inner: LocalKeyProvider,
    gate: Notify,
}

impl GatedProvider {
    pub(crate) fn new() -> Self {
        Self {
            inner: LocalKeyProvider::new(PrivateKeySigner::random(), VANAR_TESTNET),
            gate: Notify::new(),
        }
    }

    pub(crate) fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl Eip1193Provider for GatedProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.gate.notified().await;
        self.inner.request_accounts().await
    }

    async fn personal_sign(
        &self,
        message: &[u8],
        address: Address,
    ) -> Result<Signature, WalletError> {
        self.inner.personal_sign(message, address).await
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.inner.chain_id().await
    }
}

/// A provider whose user denies every request.
#[derive(Debug)]
pub(crate) struct RejectingProvider;

#[async_trait]
impl Eip1193Provider for RejectingProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Err(WalletError::rejected("eth_requestAccounts", "User denied account authorization"))
    }

    async fn personal_sign(&self, _: &[u8], _: Address) -> Result<Signature, WalletError> {
        Err(WalletError::rejected("personal_sign", "User denied message signature"))
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(VANAR_TESTNET)
    }
}
