//! Headless wallet: a [`WalletProvider`] backed by a local key and JSON-RPC.
//!
//! Behaves like a browser wallet from the session's point of view: account
//! access must be requested before it is reported, it only switches to
//! networks it knows about (answering 4902 otherwise), and it pushes
//! account and chain notifications.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::signer::SigningKey;
use crate::blockchain::transaction::{call_request, send_request, submission_receipt};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::{IssuerConfig, NetworkConfig};
use crate::wallet::{
    AddChainParams, ChainId, ContractCall, ProviderError, ProviderEvent, ProviderResult,
    SubmissionReceipt, WalletError, WalletProvider, WalletResult,
};

const EVENT_CAPACITY: usize = 16;

pub struct LocalWallet {
    key: SigningKey,
    /// Known networks by chain ID.
    networks: DashMap<u64, NetworkConfig>,
    /// Client for the currently selected network.
    client: ArcSwap<BlockchainClient>,
    authorized: AtomicBool,
    events: broadcast::Sender<ProviderEvent>,
    timeout_secs: u64,
}

impl LocalWallet {
    /// Create a wallet that knows `networks` and starts on `initial_chain_id`.
    pub fn new(
        key: SigningKey,
        networks: Vec<NetworkConfig>,
        initial_chain_id: u64,
        timeout_secs: u64,
    ) -> BlockchainResult<Self> {
        let registry = DashMap::new();
        for network in networks {
            registry.insert(network.chain_id, network);
        }

        let initial = registry
            .get(&initial_chain_id)
            .map(|entry| entry.value().clone())
            .ok_or(BlockchainError::UnknownNetwork(initial_chain_id))?;
        let client = BlockchainClient::new(&initial, key.ethereum_wallet(), timeout_secs)?;

        tracing::info!(
            address = %key.address(),
            chain_id = initial_chain_id,
            known_networks = registry.len(),
            "Headless wallet ready"
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            key,
            networks: registry,
            client: ArcSwap::from_pointee(client),
            authorized: AtomicBool::new(false),
            events,
            timeout_secs,
        })
    }

    /// Build from configuration, reading the key from the configured
    /// environment variable. Setup failures surface as
    /// [`WalletError::Unavailable`].
    pub fn from_config(config: &IssuerConfig) -> WalletResult<Self> {
        let key = SigningKey::from_env(&config.wallet.private_key_env)?;

        let mut networks = vec![config.network.clone()];
        networks.extend(config.wallet.extra_networks.iter().cloned());

        let initial = config
            .wallet
            .initial_chain_id
            .unwrap_or(config.network.chain_id);

        Ok(Self::new(key, networks, initial, config.wallet.rpc_timeout_secs)?)
    }

    pub fn address(&self) -> Address {
        self.key.address()
    }

    /// The currently selected network.
    pub fn current_network(&self) -> NetworkConfig {
        self.client.load().network().clone()
    }

    pub fn knows_chain(&self, chain_id: u64) -> bool {
        self.networks.contains_key(&chain_id)
    }

    /// Withdraw account access, as if the user disconnected the site.
    pub fn revoke(&self) {
        if self.authorized.swap(false, Ordering::SeqCst) {
            self.emit(ProviderEvent::AccountsChanged(Vec::new()));
        }
    }

    fn emit(&self, event: ProviderEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn ensure_authorized(&self, from: Address) -> ProviderResult<()> {
        if !self.authorized.load(Ordering::SeqCst) || from != self.address() {
            return Err(ProviderError::unauthorized());
        }
        Ok(())
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        if self.authorized.load(Ordering::SeqCst) {
            Ok(vec![self.address()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        if !self.authorized.swap(true, Ordering::SeqCst) {
            tracing::info!(address = %self.address(), "Account access granted");
            self.emit(ProviderEvent::AccountsChanged(vec![self.address()]));
        }
        Ok(vec![self.address()])
    }

    async fn chain_id(&self) -> ProviderResult<u64> {
        Ok(self.client.load().network().chain_id)
    }

    async fn switch_chain(&self, hex_chain_id: &str) -> ProviderResult<()> {
        let chain = ChainId::from_hex(hex_chain_id).ok_or_else(|| {
            ProviderError::new(
                ProviderError::INVALID_PARAMS,
                format!("Invalid chain ID \"{}\"", hex_chain_id),
            )
        })?;

        let network = self
            .networks
            .get(&chain.0)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ProviderError::unrecognized_chain(hex_chain_id))?;

        if self.client.load().network().chain_id == chain.0 {
            return Ok(());
        }

        let client = BlockchainClient::new(&network, self.key.ethereum_wallet(), self.timeout_secs)
            .map_err(|e| ProviderError::internal(e.to_string()))?;
        if let Err(e) = client.verify_chain_id().await {
            tracing::warn!(chain_id = %chain, error = %e, "Endpoint chain verification failed");
        }

        self.client.store(Arc::new(client));
        tracing::info!(chain_id = %chain, chain_name = %network.chain_name, "Switched network");
        self.emit(ProviderEvent::ChainChanged(chain));
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()> {
        let network = NetworkConfig::from_add_chain_params(params)
            .filter(|network| !network.rpc_urls.is_empty())
            .ok_or_else(|| {
                ProviderError::new(
                    ProviderError::INVALID_PARAMS,
                    "Invalid wallet_addEthereumChain parameters",
                )
            })?;

        tracing::info!(
            chain_id = network.chain_id,
            chain_name = %network.chain_name,
            "Adding network"
        );
        self.networks.insert(network.chain_id, network);
        self.switch_chain(&params.chain_id).await
    }

    async fn get_code(&self, address: Address) -> ProviderResult<Bytes> {
        self.client.load_full().get_code(address).await
    }

    async fn get_balance(&self, address: Address) -> ProviderResult<U256> {
        self.client.load_full().get_balance(address).await
    }

    async fn estimate_gas(&self, call: &ContractCall) -> ProviderResult<u64> {
        self.client.load_full().estimate_gas(&call_request(call)).await
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        gas_limit: u64,
    ) -> ProviderResult<SubmissionReceipt> {
        self.ensure_authorized(call.from)?;
        let receipt = self
            .client
            .load_full()
            .send_transaction(send_request(call, gas_limit))
            .await?;
        Ok(submission_receipt(&receipt))
    }

    async fn call(&self, call: &ContractCall) -> ProviderResult<Bytes> {
        self.client.load_full().call(&call_request(call)).await
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
