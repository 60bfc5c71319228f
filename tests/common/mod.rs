//! Shared utilities for integration testing: a scripted wallet provider.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, Bytes, Log, B256, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use tokio::sync::{broadcast, Notify};

use certificate_issuer::certificate::contract::CertificateCreated;
use certificate_issuer::config::IssuerConfig;
use certificate_issuer::wallet::{
    AddChainParams, ChainId, ContractCall, ProviderError, ProviderEvent, ProviderResult,
    SubmissionReceipt, WalletProvider,
};

pub const ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const TARGET_CHAIN: u64 = 14601;
pub const OTHER_CHAIN: u64 = 1;

/// Everything the fake has been asked to do, plus its scripted answers.
pub struct FakeState {
    pub authorized: bool,
    pub chain_id: u64,
    pub known_chains: Vec<u64>,
    /// Method names in call order.
    pub calls: Vec<&'static str>,
    pub switch_requests: Vec<String>,
    pub added_chains: Vec<AddChainParams>,
    pub sent: Vec<(ContractCall, u64)>,

    pub request_accounts_error: Option<ProviderError>,
    /// When set, `request_accounts` waits for a permit, like an open prompt.
    pub accounts_gate: Option<Arc<Notify>>,
    pub switch_error: Option<ProviderError>,
    pub add_error: Option<ProviderError>,
    pub code: Bytes,
    pub balance: U256,
    pub estimate: Result<u64, ProviderError>,
    pub send_error: Option<ProviderError>,
    /// When set, `send_transaction` waits for a permit before answering.
    pub send_gate: Option<Arc<Notify>>,
    pub receipt_status: bool,
    pub receipt_block: Option<u64>,
    pub receipt_logs: Vec<Log>,
    pub call_response: Bytes,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            authorized: false,
            chain_id: TARGET_CHAIN,
            known_chains: vec![TARGET_CHAIN, OTHER_CHAIN],
            calls: Vec::new(),
            switch_requests: Vec::new(),
            added_chains: Vec::new(),
            sent: Vec::new(),
            request_accounts_error: None,
            accounts_gate: None,
            switch_error: None,
            add_error: None,
            code: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
            balance: U256::from(10u64).pow(U256::from(18)),
            estimate: Ok(100_000),
            send_error: None,
            send_gate: None,
            receipt_status: true,
            receipt_block: Some(42),
            receipt_logs: Vec::new(),
            call_response: Bytes::new(),
        }
    }
}

/// A scripted wallet provider that records every request.
pub struct FakeProvider {
    state: Mutex<FakeState>,
    events: broadcast::Sender<ProviderEvent>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Self::with_state(FakeState::default())
    }

    pub fn with_state(state: FakeState) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            state: Mutex::new(state),
            events,
        })
    }

    /// Change the scripted state.
    pub fn script(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Inspect the recorded state.
    pub fn inspect<T>(&self, f: impl FnOnce(&FakeState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inspect(|s| s.calls.clone())
    }

    pub fn called(&self, method: &str) -> bool {
        self.calls().iter().any(|c| *c == method)
    }

    /// Hold every `send_transaction` until the returned gate is notified.
    pub fn hold_sends(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.script(|s| s.send_gate = Some(gate.clone()));
        gate
    }

    /// Keep the account prompt open until the returned gate is notified.
    pub fn hold_account_requests(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.script(|s| s.accounts_gate = Some(gate.clone()));
        gate
    }

    /// Push a notification as the wallet would.
    pub fn emit(&self, event: ProviderEvent) {
        if let ProviderEvent::ChainChanged(chain) = &event {
            self.script(|s| s.chain_id = chain.0);
        }
        let _ = self.events.send(event);
    }

    fn record(&self, method: &'static str) {
        self.state.lock().unwrap().calls.push(method);
    }
}

#[async_trait]
impl WalletProvider for FakeProvider {
    async fn accounts(&self) -> ProviderResult<Vec<Address>> {
        self.record("eth_accounts");
        Ok(if self.inspect(|s| s.authorized) {
            vec![ACCOUNT]
        } else {
            Vec::new()
        })
    }

    async fn request_accounts(&self) -> ProviderResult<Vec<Address>> {
        self.record("eth_requestAccounts");
        if let Some(gate) = self.inspect(|s| s.accounts_gate.clone()) {
            gate.notified().await;
        }
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.request_accounts_error.clone() {
            return Err(err);
        }
        state.authorized = true;
        drop(state);
        let _ = self.events.send(ProviderEvent::AccountsChanged(vec![ACCOUNT]));
        Ok(vec![ACCOUNT])
    }

    async fn chain_id(&self) -> ProviderResult<u64> {
        self.record("eth_chainId");
        Ok(self.inspect(|s| s.chain_id))
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> ProviderResult<()> {
        self.record("wallet_switchEthereumChain");
        let mut state = self.state.lock().unwrap();
        state.switch_requests.push(chain_id_hex.to_string());
        if let Some(err) = state.switch_error.clone() {
            return Err(err);
        }
        let chain = ChainId::from_hex(chain_id_hex)
            .ok_or_else(|| ProviderError::new(ProviderError::INVALID_PARAMS, "bad chain id"))?;
        if !state.known_chains.contains(&chain.0) {
            return Err(ProviderError::unrecognized_chain(chain_id_hex));
        }
        state.chain_id = chain.0;
        drop(state);
        let _ = self.events.send(ProviderEvent::ChainChanged(chain));
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> ProviderResult<()> {
        self.record("wallet_addEthereumChain");
        let mut state = self.state.lock().unwrap();
        state.added_chains.push(params.clone());
        if let Some(err) = state.add_error.clone() {
            return Err(err);
        }
        let chain = ChainId::from_hex(&params.chain_id)
            .ok_or_else(|| ProviderError::new(ProviderError::INVALID_PARAMS, "bad chain id"))?;
        state.known_chains.push(chain.0);
        state.chain_id = chain.0;
        drop(state);
        let _ = self.events.send(ProviderEvent::ChainChanged(chain));
        Ok(())
    }

    async fn get_code(&self, _address: Address) -> ProviderResult<Bytes> {
        self.record("eth_getCode");
        Ok(self.inspect(|s| s.code.clone()))
    }

    async fn get_balance(&self, _address: Address) -> ProviderResult<U256> {
        self.record("eth_getBalance");
        Ok(self.inspect(|s| s.balance))
    }

    async fn estimate_gas(&self, _call: &ContractCall) -> ProviderResult<u64> {
        self.record("eth_estimateGas");
        self.inspect(|s| s.estimate.clone())
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        gas_limit: u64,
    ) -> ProviderResult<SubmissionReceipt> {
        self.record("eth_sendTransaction");
        if let Some(gate) = self.inspect(|s| s.send_gate.clone()) {
            gate.notified().await;
        }
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.send_error.clone() {
            return Err(err);
        }
        state.sent.push((call.clone(), gas_limit));
        Ok(SubmissionReceipt {
            transaction_hash: B256::with_last_byte(state.sent.len() as u8),
            block_number: state.receipt_block,
            gas_used: 80_000,
            status: state.receipt_status,
            logs: state.receipt_logs.clone(),
        })
    }

    async fn call(&self, _call: &ContractCall) -> ProviderResult<Bytes> {
        self.record("eth_call");
        Ok(self.inspect(|s| s.call_response.clone()))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// Default configuration; the target is Sonic Testnet.
pub fn config() -> IssuerConfig {
    IssuerConfig::default()
}

/// A `CertificateCreated` log from the configured registry.
pub fn created_log(certificate_id: B256) -> Log {
    let event = CertificateCreated {
        certificateId: certificate_id,
        issuer: ACCOUNT,
        recipientName: "Ada Lovelace".to_string(),
        eventName: "Rust Workshop".to_string(),
    };
    Log {
        address: config().contract.address,
        data: event.encode_log_data(),
    }
}
