//! The account bootstrap sequencer.

use crate::{
    AccountError, AccountFactory, BundlerClient, ChainClient, Connector, PaymasterClient, Result,
    SimpleAccountFactory, SmartAccountClient, SmartAccountDescriptor,
};
use alloy_primitives::{Address, B256, Bytes, U256};
use parking_lot::Mutex;
use std::{fmt, sync::Arc};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use vanguard_config::{
    ChainConfig, Config, ConfigError, DEFAULT_BUNDLER_URL, EntryPointVersion, GasFees,
    SIMPLE_ACCOUNT_FACTORY, UserOperationDefaults,
};
use vanguard_wallets::{AccountSigner, Eip1193Provider, provider_to_signer};

/// Everything a bootstrap needs besides the provider. Fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub chain: ChainConfig,
    /// Bundler and paymaster service url.
    pub bundler_url: String,
    pub api_key: Option<String>,
    /// Extra http headers for the service, in `name: value` form.
    pub headers: Vec<String>,
    pub entry_point: EntryPointVersion,
    pub factory: Address,
    pub salt: U256,
    pub fees: GasFees,
    pub defaults: UserOperationDefaults,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::vanar_testnet(),
            bundler_url: DEFAULT_BUNDLER_URL.to_string(),
            api_key: None,
            headers: vec![],
            entry_point: EntryPointVersion::V07,
            factory: SIMPLE_ACCOUNT_FACTORY,
            salt: U256::ZERO,
            fees: GasFees::default(),
            defaults: UserOperationDefaults::default(),
        }
    }
}

impl BootstrapConfig {
    /// Resolves the chain and service settings out of `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            chain: config.chain()?,
            bundler_url: config.bundler_url.clone(),
            api_key: config.bundler_api_key.clone(),
            headers: config.bundler_headers.clone(),
            entry_point: config.entry_point,
            factory: config.factory,
            salt: config.salt(),
            fees: config.gas_fees(),
            defaults: UserOperationDefaults::default(),
        })
    }
}

/// The values derived from one provider, published together.
#[derive(Clone, Debug)]
pub struct Bootstrapped {
    pub provider: Arc<dyn Eip1193Provider>,
    pub signer: AccountSigner,
    pub descriptor: SmartAccountDescriptor,
    pub client: SmartAccountClient,
    pub chain: Arc<dyn ChainClient>,
    pub bundler: Arc<dyn BundlerClient>,
    pub paymaster: Arc<dyn PaymasterClient>,
}

/// What consumers of a [`Session`] can observe.
#[derive(Clone, Debug, Default)]
pub enum SessionState {
    /// No provider, or the bootstrap for the current provider has not finished.
    #[default]
    Unbootstrapped,
    Bootstrapped(Arc<Bootstrapped>),
}

impl SessionState {
    pub fn is_bootstrapped(&self) -> bool {
        matches!(self, Self::Bootstrapped(_))
    }

    pub fn bootstrapped(&self) -> Option<&Arc<Bootstrapped>> {
        match self {
            Self::Bootstrapped(b) => Some(b),
            Self::Unbootstrapped => None,
        }
    }
}

/// Runs the bootstrap pipeline.
#[derive(Clone, Debug)]
pub struct Bootstrapper {
    config: BootstrapConfig,
    connector: Arc<dyn Connector>,
    factory: Arc<dyn AccountFactory>,
}

impl Bootstrapper {
    /// Creates a bootstrapper using a [`SimpleAccountFactory`] with the configured salt.
    pub fn new(config: BootstrapConfig, connector: Arc<dyn Connector>) -> Self {
        let factory = Arc::new(SimpleAccountFactory::new(config.salt));
        Self { config, connector, factory }
    }

    pub fn with_factory(mut self, factory: Arc<dyn AccountFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Turns `provider` into a smart account client.
    ///
    /// Steps run in order and none is skipped. The first failure aborts the pipeline and nothing
    /// derived so far is kept.
    pub async fn bootstrap(&self, provider: Arc<dyn Eip1193Provider>) -> Result<Bootstrapped> {
        let config = &self.config;

        let signer = provider_to_signer(provider.clone()).await?;
        debug!(owner = %alloy_signer::Signer::address(&signer), "bootstrap: signer derived");

        let paymaster = self.connector.paymaster(config)?;
        debug!(
            url = %config.bundler_url,
            chain_id = config.chain.id,
            "bootstrap: paymaster client"
        );

        let bundler = self.connector.bundler(config)?;
        debug!(entry_point = %config.entry_point, "bootstrap: bundler client");

        let chain = self.connector.chain(config)?;
        debug!(chain = %config.chain, "bootstrap: chain client");

        let descriptor = self
            .factory
            .compute_account_address(chain.as_ref(), &signer, config.entry_point, config.factory)
            .await?;
        debug!(address = %descriptor.address, "bootstrap: smart account resolved");

        let client = SmartAccountClient::new(
            descriptor.clone(),
            signer.clone(),
            chain.clone(),
            bundler.clone(),
            Some(paymaster.clone()),
        )?
        .with_defaults(config.defaults);

        Ok(Bootstrapped { provider, signer, descriptor, client, chain, bundler, paymaster })
    }
}

struct Current {
    generation: u64,
    provider: Option<Arc<dyn Eip1193Provider>>,
}

struct Inner {
    bootstrapper: Bootstrapper,
    // held while comparing generations and publishing
    current: Mutex<Current>,
    state: watch::Sender<SessionState>,
}

/// Owns the provider of the logged in user and everything derived from it.
///
/// Each [`set_provider`](Self::set_provider) call starts a new generation. A bootstrap only
/// publishes if its generation is still current when it finishes; older pipelines run to
/// completion and their results are dropped.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("generation", &self.generation())
            .field("bootstrapped", &self.state().is_bootstrapped())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(bootstrapper: Bootstrapper) -> Self {
        let (state, _) = watch::channel(SessionState::Unbootstrapped);
        Self {
            inner: Arc::new(Inner {
                bootstrapper,
                current: Mutex::new(Current { generation: 0, provider: None }),
                state,
            }),
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        self.inner.bootstrapper.config()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn bootstrapped(&self) -> Option<Arc<Bootstrapped>> {
        self.state().bootstrapped().cloned()
    }

    /// The current provider, set even while its bootstrap is still running.
    pub fn provider(&self) -> Option<Arc<dyn Eip1193Provider>> {
        self.inner.current.lock().provider.clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.current.lock().generation
    }

    /// Replaces the provider.
    ///
    /// Everything derived from the previous provider is cleared at once. With a new provider a
    /// bootstrap is spawned on the current tokio runtime; `None` (logout) leaves the session
    /// unbootstrapped.
    ///
    /// Fails with [`AccountError::NoRuntime`], leaving the session untouched, if a provider is
    /// given outside of a tokio runtime.
    pub fn set_provider(
        &self,
        provider: Option<Arc<dyn Eip1193Provider>>,
    ) -> Result<Option<BootstrapTask>> {
        let runtime = match provider {
            Some(_) => Some(Handle::try_current().map_err(|_| AccountError::NoRuntime)?),
            None => None,
        };

        let generation = self.inner.replace_provider(provider.clone());
        let (Some(provider), Some(runtime)) = (provider, runtime) else {
            debug!(generation, "provider cleared");
            return Ok(None);
        };

        debug!(generation, "provider changed, bootstrapping");
        let inner = self.inner.clone();
        let handle = runtime.spawn(async move { inner.run(generation, provider).await });
        Ok(Some(BootstrapTask { generation, handle }))
    }

    /// Sets `provider` and waits for its bootstrap.
    ///
    /// Returns whether the result was published, i.e. no newer provider arrived meanwhile.
    pub async fn connect(&self, provider: Arc<dyn Eip1193Provider>) -> Result<bool> {
        match self.set_provider(Some(provider))? {
            Some(task) => task.wait().await,
            None => Ok(false),
        }
    }

    /// Clears the provider and everything derived from it.
    pub fn clear(&self) {
        let generation = self.inner.replace_provider(None);
        debug!(generation, "provider cleared");
    }

    /// The client, or [`AccountError::NotReady`] if the session is not bootstrapped.
    pub fn require_client(&self) -> Result<SmartAccountClient> {
        self.bootstrapped().map(|b| b.client.clone()).ok_or(AccountError::NotReady)
    }

    /// Sends a transaction from the smart account with the configured fees.
    ///
    /// Returns `Ok(None)` without touching the network if the session is not bootstrapped.
    pub async fn send_transaction(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> Result<Option<B256>> {
        let Some(bootstrapped) = self.bootstrapped() else {
            warn!("smart account not initialized yet");
            return Ok(None);
        };
        let fees = self.config().fees;
        let hash = bootstrapped.client.send_transaction(to, value, data, fees).await?;
        Ok(Some(hash))
    }
}

impl Inner {
    /// Starts a new generation with `provider`, unpublishing the previous one.
    fn replace_provider(&self, provider: Option<Arc<dyn Eip1193Provider>>) -> u64 {
        let mut current = self.current.lock();
        current.generation += 1;
        current.provider = provider;
        self.state.send_replace(SessionState::Unbootstrapped);
        current.generation
    }

    async fn run(&self, generation: u64, provider: Arc<dyn Eip1193Provider>) -> Result<bool> {
        let result = self.bootstrapper.bootstrap(provider).await;

        let current = self.current.lock();
        if current.generation != generation {
            debug!(generation, current = current.generation, "bootstrap superseded, discarding");
            return Ok(false);
        }
        match result {
            Ok(bootstrapped) => {
                let address = bootstrapped.descriptor.address;
                info!(generation, %address, "smart account ready");
                self.state.send_replace(SessionState::Bootstrapped(Arc::new(bootstrapped)));
                Ok(true)
            }
            Err(err) => {
                error!(generation, %err, "bootstrap failed");
                Err(err)
            }
        }
    }
}

/// Handle to a spawned bootstrap.
#[derive(Debug)]
pub struct BootstrapTask {
    generation: u64,
    handle: JoinHandle<Result<bool>>,
}

impl BootstrapTask {
    /// Waits for the pipeline. `Ok(false)` if it was superseded.
    pub async fn wait(self) -> Result<bool> {
        let generation = self.generation;
        self.handle
            .await
            .map_err(|err| AccountError::Task(format!("generation {generation}: {err}")))?
    }
}
