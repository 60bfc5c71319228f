//! Headless wallet error definitions and alloy error mapping.

use alloy::providers::PendingTransactionError;
use alloy::transports::TransportError;
use thiserror::Error;

use crate::wallet::{ProviderError, WalletError};

/// Errors that can occur while setting up the headless wallet.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// An RPC request failed.
    #[error("RPC error: {0}")]
    Rpc(#[from] ProviderError),

    /// A network has no usable RPC endpoint.
    #[error("No usable RPC endpoint for chain {0}")]
    NoEndpoints(u64),

    /// Invalid private key format or missing key.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The endpoint reports a different chain than configured.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The chain the wallet should start on is not configured.
    #[error("Unknown network {0}")]
    UnknownNetwork(u64),
}

/// Result type for headless wallet setup.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

impl From<BlockchainError> for WalletError {
    fn from(err: BlockchainError) -> Self {
        WalletError::Unavailable(err.to_string())
    }
}

/// Convert an alloy transport error into a provider error.
///
/// JSON-RPC error responses keep their code, message and raw `data`.
/// Anything else (connection refused, bad response) is reported as a
/// disconnect.
pub fn map_transport_error(err: &TransportError) -> ProviderError {
    match err.as_error_resp() {
        Some(payload) => ProviderError {
            code: payload.code,
            message: payload.message.to_string(),
            data: payload.data.as_ref().map(|data| data.get().to_string()),
        },
        None => ProviderError::disconnected(err.to_string()),
    }
}

/// Whether an error came back from a node, as opposed to never reaching one.
pub fn is_error_response(err: &TransportError) -> bool {
    err.as_error_resp().is_some()
}

/// Convert a receipt-watching failure into a provider error.
pub fn map_pending_error(err: PendingTransactionError) -> ProviderError {
    match err {
        PendingTransactionError::TransportError(e) => map_transport_error(&e),
        other => ProviderError::new(
            ProviderError::SERVER,
            format!("Failed to obtain transaction receipt: {}", other),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::{RpcError, TransportErrorKind};
    use serde_json::value::RawValue;

    #[test]
    fn test_error_response_keeps_code_and_data() {
        let payload = ErrorPayload {
            code: 3,
            message: "execution reverted: Not allowed".into(),
            data: Some(RawValue::from_string("\"0x08c379a0\"".to_string()).unwrap()),
        };
        let err: TransportError = RpcError::ErrorResp(payload);

        assert!(is_error_response(&err));
        let mapped = map_transport_error(&err);
        assert_eq!(mapped.code, 3);
        assert_eq!(mapped.message, "execution reverted: Not allowed");
        assert_eq!(mapped.data.as_deref(), Some("\"0x08c379a0\""));
    }

    #[test]
    fn test_transport_failure_is_disconnect() {
        let err = TransportErrorKind::custom_str("connection refused");
        assert!(!is_error_response(&err));
        assert_eq!(map_transport_error(&err).code, ProviderError::DISCONNECTED);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::ChainMismatch {
            expected: 14601,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Chain ID mismatch: expected 14601, got 1");

        let wallet_err: WalletError = BlockchainError::Wallet("missing key".into()).into();
        assert!(matches!(wallet_err, WalletError::Unavailable(_)));
    }
}
