//! The wallet capability the session manager and submission workflow consume.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::wallet::types::{
    AddChainParams, ContractCall, ProviderEvent, ProviderResult, SubmissionReceipt,
};

/// An EIP-1193 style wallet: accounts, networks, and contract calls.
///
/// Passed explicitly into the session manager and the submission workflow so
/// a fake can stand in for tests.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorised for this client (`eth_accounts`). Never prompts.
    async fn accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Ask for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Current chain ID (`eth_chainId`).
    async fn chain_id(&self) -> ProviderResult<u64>;

    /// `wallet_switchEthereumChain`. Fails with code 4902 for unknown chains.
    async fn switch_chain(&self, chain_id_hex: &str) -> ProviderResult<()>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()>;

    /// Deployed bytecode at `address`; empty if none.
    async fn get_code(&self, address: Address) -> ProviderResult<Bytes>;

    /// Native balance in wei.
    async fn get_balance(&self, address: Address) -> ProviderResult<U256>;

    async fn estimate_gas(&self, call: &ContractCall) -> ProviderResult<u64>;

    /// Sign, send and wait for the receipt.
    async fn send_transaction(
        &self,
        call: &ContractCall,
        gas_limit: u64,
    ) -> ProviderResult<SubmissionReceipt>;

    /// Read-only `eth_call`.
    async fn call(&self, call: &ContractCall) -> ProviderResult<Bytes>;

    /// Subscribe to account and chain change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
