//! Wallet boundary types and error definitions.

use std::fmt;

use alloy::primitives::{Address, Bytes, Log, TxHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    /// `0x`-prefixed lowercase hex, as wallets expect (14601 → `0x3909`).
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parse a `0x`-prefixed hex chain ID.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X"))?;
        u64::from_str_radix(digits, 16).ok().map(Self)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Native currency metadata for an EVM network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// EIP-3085 `wallet_addEthereumChain` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// Notification pushed by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The authorised account list changed. Empty means disconnected.
    AccountsChanged(Vec<Address>),
    /// The wallet switched networks.
    ChainChanged(ChainId),
}

/// A contract call the wallet should estimate, send, or execute read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub from: Address,
    pub to: Address,
    pub input: Bytes,
}

/// What the wallet hands back once a transaction is mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// `false` when the transaction reverted.
    pub status: bool,
    pub logs: Vec<Log>,
}

/// EIP-1193 style provider error.
///
/// Display is the raw message, so classified failures can surface it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    /// Raw JSON `data` member, if the provider attached one.
    pub data: Option<String>,
}

impl ProviderError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// The account has not been authorised yet.
    pub const UNAUTHORIZED: i64 = 4100;
    /// No endpoint reachable.
    pub const DISCONNECTED: i64 = 4900;
    /// Generic JSON-RPC server error.
    pub const SERVER: i64 = -32000;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn user_rejected() -> Self {
        Self::new(Self::USER_REJECTED, "User rejected the request.")
    }

    pub fn unrecognized_chain(hex_chain_id: &str) -> Self {
        Self::new(
            Self::UNRECOGNIZED_CHAIN,
            format!("Unrecognized chain ID \"{}\".", hex_chain_id),
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(
            Self::UNAUTHORIZED,
            "The requested account has not been authorized by the user.",
        )
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::new(Self::DISCONNECTED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Self::USER_REJECTED
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Self::UNRECOGNIZED_CHAIN
    }
}

/// Result type for raw provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by the wallet session layer.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No usable wallet (missing key, no reachable endpoint).
    #[error("Wallet not available: {0}")]
    Unavailable(String),

    /// The provider rejected a request.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The target network was unknown and adding it failed too.
    #[error("Could not add {chain_name} to the wallet: {source}")]
    AddNetwork {
        chain_name: String,
        source: ProviderError,
    },
}

/// Result type for wallet session operations.
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(14601u64);
        assert_eq!(u64::from(chain_id), 14601);
        assert_eq!(chain_id.to_hex(), "0x3909");
        assert_eq!(ChainId::from_hex("0x3909"), Some(chain_id));
        assert_eq!(ChainId::from_hex("0X3909"), Some(chain_id));
        assert_eq!(ChainId::from_hex("3909"), None);
        assert_eq!(ChainId::from_hex("0xzz"), None);
    }

    #[test]
    fn test_add_chain_params_wire_names() {
        let params = AddChainParams {
            chain_id: "0x3909".to_string(),
            chain_name: "Sonic Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "Sonic".to_string(),
                symbol: "S".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://rpc.testnet.soniclabs.com".to_string()],
            block_explorer_urls: vec!["https://testnet.soniclabs.com/".to_string()],
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["chainId"], "0x3909");
        assert_eq!(json["chainName"], "Sonic Testnet");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["rpcUrls"][0], "https://rpc.testnet.soniclabs.com");
        assert_eq!(json["blockExplorerUrls"][0], "https://testnet.soniclabs.com/");
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::user_rejected();
        assert!(err.is_user_rejection());
        assert_eq!(err.to_string(), "User rejected the request.");

        let err = WalletError::AddNetwork {
            chain_name: "Sonic Testnet".to_string(),
            source: ProviderError::internal("boom"),
        };
        assert!(err.to_string().contains("Sonic Testnet"));
        assert!(err.to_string().contains("boom"));
    }
}
