//! JSON-RPC client for one network, with timeouts and endpoint failover.
//!
//! # Responsibilities
//! - Connect to every configured endpoint of a network
//! - Query chain state (chain ID, code, balances) and run calls/estimates
//! - Sign and send transactions through the primary endpoint
//! - Handle timeouts and unreachable endpoints gracefully

use std::future::Future;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{
    is_error_response, map_pending_error, map_transport_error, BlockchainError, BlockchainResult,
};
use crate::config::NetworkConfig;
use crate::wallet::{ProviderError, ProviderResult};

/// Upper bound on waiting for a sent transaction to be mined.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// RPC client for one network, with failover across its endpoints.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Providers in configured order (primary first).
    providers: Vec<DynProvider>,
    network: NetworkConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a client for `network` that signs with `wallet`.
    ///
    /// Invalid endpoint URLs are skipped; at least one must parse.
    pub fn new(
        network: &NetworkConfig,
        wallet: EthereumWallet,
        timeout_secs: u64,
    ) -> BlockchainResult<Self> {
        let mut providers = Vec::new();

        for url_str in &network.rpc_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push(
                    ProviderBuilder::new()
                        .wallet(wallet.clone())
                        .connect_http(url)
                        .erased(),
                ),
                Err(e) => tracing::warn!(url = %url_str, error = %e, "Ignoring invalid RPC URL"),
            }
        }

        if providers.is_empty() {
            return Err(BlockchainError::NoEndpoints(network.chain_id));
        }

        tracing::debug!(
            chain_id = network.chain_id,
            endpoints = providers.len(),
            "RPC client initialized"
        );

        Ok(Self {
            providers,
            network: network.clone(),
            timeout_duration: Duration::from_secs(timeout_secs),
        })
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Run `op` against each endpoint in turn.
    ///
    /// A JSON-RPC error response is final: the node answered. Transport
    /// failures and timeouts move on to the next endpoint.
    async fn with_failover<T, F, Fut>(&self, method: &'static str, op: F) -> ProviderResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) if is_error_response(&e) => return Err(map_transport_error(&e)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, method, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout, trying next provider");
                }
            }
        }
        Err(ProviderError::disconnected(format!(
            "All RPC providers failed for {}",
            method
        )))
    }

    pub async fn chain_id(&self) -> ProviderResult<u64> {
        self.with_failover("eth_chainId", |p| async move { p.get_chain_id().await })
            .await
    }

    /// Check the endpoint actually serves the configured chain.
    pub async fn verify_chain_id(&self) -> Result<(), BlockchainError> {
        let actual = self.chain_id().await?;
        if actual != self.network.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.network.chain_id,
                actual,
            });
        }
        Ok(())
    }

    pub async fn get_code(&self, address: Address) -> ProviderResult<Bytes> {
        self.with_failover("eth_getCode", |p| async move { p.get_code_at(address).await })
            .await
    }

    pub async fn get_balance(&self, address: Address) -> ProviderResult<U256> {
        self.with_failover("eth_getBalance", |p| async move { p.get_balance(address).await })
            .await
    }

    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> ProviderResult<u64> {
        self.with_failover("eth_estimateGas", |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    pub async fn call(&self, tx: &TransactionRequest) -> ProviderResult<Bytes> {
        self.with_failover("eth_call", |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
    }

    /// Sign, send and wait for the receipt. Primary endpoint only, so a
    /// transaction is never broadcast twice.
    pub async fn send_transaction(
        &self,
        tx: TransactionRequest,
    ) -> ProviderResult<TransactionReceipt> {
        let provider = &self.providers[0];

        let pending = match timeout(self.timeout_duration, provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(map_transport_error(&e)),
            Err(_) => {
                return Err(ProviderError::disconnected(format!(
                    "RPC timeout after {} seconds",
                    self.timeout_duration.as_secs()
                )))
            }
        };

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, "Transaction sent, waiting for receipt");

        pending
            .with_timeout(Some(RECEIPT_TIMEOUT))
            .get_receipt()
            .await
            .map_err(map_pending_error)
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_urls", &self.network.rpc_urls)
            .field("chain_id", &self.network.chain_id)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
