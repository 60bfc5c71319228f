//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML. Every section
//! defaults to the built-in Sonic Testnet deployment, so an empty file is a
//! valid configuration.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::config::constants;
use crate::wallet::types::{AddChainParams, ChainId, NativeCurrency};

/// Root configuration for the certificate issuer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IssuerConfig {
    /// Target network the certificate contract lives on.
    pub network: NetworkConfig,

    /// Certificate registry contract.
    pub contract: ContractConfig,

    /// Pre-flight checks and gas policy for submissions.
    pub submission: SubmissionConfig,

    /// Headless wallet settings.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network definition, in the shape wallets expect for `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Numeric chain ID.
    pub chain_id: u64,

    /// Human-readable network name shown by the wallet.
    pub chain_name: String,

    /// Native currency metadata.
    pub native_currency: NativeCurrency,

    /// JSON-RPC endpoints, primary first.
    pub rpc_urls: Vec<String>,

    /// Block explorer base URLs.
    pub block_explorer_urls: Vec<String>,
}

impl NetworkConfig {
    /// Typed chain ID.
    pub fn chain(&self) -> ChainId {
        ChainId(self.chain_id)
    }

    /// Chain ID as a `0x`-prefixed hex string.
    pub fn hex_chain_id(&self) -> String {
        self.chain().to_hex()
    }

    /// Payload for `wallet_addEthereumChain`.
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.hex_chain_id(),
            chain_name: self.chain_name.clone(),
            native_currency: self.native_currency.clone(),
            rpc_urls: self.rpc_urls.clone(),
            block_explorer_urls: self.block_explorer_urls.clone(),
        }
    }

    /// Rebuild a network definition from an add-chain request.
    ///
    /// Returns `None` when the hex chain ID does not parse.
    pub fn from_add_chain_params(params: &AddChainParams) -> Option<Self> {
        let chain = ChainId::from_hex(&params.chain_id)?;
        Some(Self {
            chain_id: chain.0,
            chain_name: params.chain_name.clone(),
            native_currency: params.native_currency.clone(),
            rpc_urls: params.rpc_urls.clone(),
            block_explorer_urls: params.block_explorer_urls.clone(),
        })
    }

    /// Explorer link for a transaction hash, if an explorer is configured.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> Option<String> {
        self.block_explorer_urls
            .first()
            .map(|base| format!("{}/tx/{}", base.trim_end_matches('/'), tx_hash))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: constants::SONIC_TESTNET_CHAIN_ID,
            chain_name: constants::SONIC_TESTNET_NAME.to_string(),
            native_currency: NativeCurrency {
                name: constants::SONIC_CURRENCY_NAME.to_string(),
                symbol: constants::SONIC_CURRENCY_SYMBOL.to_string(),
                decimals: constants::SONIC_CURRENCY_DECIMALS,
            },
            rpc_urls: vec![constants::SONIC_TESTNET_RPC_URL.to_string()],
            block_explorer_urls: vec![constants::SONIC_TESTNET_EXPLORER_URL.to_string()],
        }
    }
}

/// Certificate registry contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed registry.
    pub address: Address,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: constants::CERTIFICATE_CONTRACT_ADDRESS,
        }
    }
}

/// Submission policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Refuse to submit when the contract address has no deployed code.
    pub check_contract_code: bool,

    /// Refuse to submit when the sender balance is below `min_balance_wei`.
    pub check_balance: bool,

    /// Minimum sender balance in wei.
    pub min_balance_wei: u64,

    /// Safety margin added on top of the gas estimate, in percent.
    pub gas_margin_percent: u64,

    /// Development mode: fabricate a tagged simulated result when gas
    /// estimation fails instead of reporting the failure.
    pub simulate_on_estimate_failure: bool,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            check_contract_code: true,
            check_balance: true,
            min_balance_wei: constants::MIN_BALANCE_WEI,
            gas_margin_percent: constants::GAS_MARGIN_PERCENT,
            simulate_on_estimate_failure: false,
        }
    }
}

/// Headless wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Environment variable holding the hex private key.
    pub private_key_env: String,

    /// Per-request RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Chain the wallet starts on. Defaults to the target network.
    pub initial_chain_id: Option<u64>,

    /// Networks the wallet knows about besides the one it starts on.
    pub extra_networks: Vec<NetworkConfig>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: constants::PRIVATE_KEY_ENV_VAR.to_string(),
            rpc_timeout_secs: 10,
            initial_chain_id: None,
            extra_networks: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_network_is_sonic_testnet() {
        let network = NetworkConfig::default();
        assert_eq!(network.chain_id, 14601);
        assert_eq!(network.hex_chain_id(), "0x3909");
        assert_eq!(network.chain_name, "Sonic Testnet");
        assert_eq!(network.native_currency.symbol, "S");
        assert_eq!(network.native_currency.decimals, 18);
    }

    #[test]
    fn test_add_chain_params_carry_metadata() {
        let params = NetworkConfig::default().add_chain_params();
        assert_eq!(params.chain_id, "0x3909");
        assert_eq!(params.rpc_urls, vec!["https://rpc.testnet.soniclabs.com"]);
        assert_eq!(params.block_explorer_urls, vec!["https://testnet.soniclabs.com/"]);

        let rebuilt = NetworkConfig::from_add_chain_params(&params).unwrap();
        assert_eq!(rebuilt, NetworkConfig::default());
    }

    #[test]
    fn test_explorer_tx_url() {
        let network = NetworkConfig::default();
        assert_eq!(
            network.explorer_tx_url("0xabc").as_deref(),
            Some("https://testnet.soniclabs.com/tx/0xabc")
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: IssuerConfig = toml::from_str(
            r#"
            [submission]
            gas_margin_percent = 30

            [wallet]
            rpc_timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.submission.gas_margin_percent, 30);
        assert!(config.submission.check_balance);
        assert_eq!(config.wallet.rpc_timeout_secs, 3);
        assert_eq!(config.network.chain_id, 14601);
        assert_eq!(config.contract.address, constants::CERTIFICATE_CONTRACT_ADDRESS);
    }
}
