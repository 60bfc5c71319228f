//! Map wallet and contract errors to user-facing failure categories.

use alloy::primitives::{hex, Address, TxHash, U256};
use alloy::sol_types::{decode_revert_reason, Revert, SolError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::wallet::ProviderError;

/// Geth's JSON-RPC code for a reverted call.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Why a submission failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    UserRejected,
    InsufficientFunds,
    BalanceBelowMinimum,
    ContractMissing,
    Reverted { reason: Option<String> },
    NodeError,
    ContractError,
    Unclassified,
}

impl FailureReason {
    /// Fixed user-facing message for this category.
    pub fn user_message(&self) -> String {
        match self {
            FailureReason::UserRejected => "Transaction rejected by the user".to_string(),
            FailureReason::InsufficientFunds => "Insufficient funds to pay for gas".to_string(),
            FailureReason::BalanceBelowMinimum => {
                "Balance is below the minimum needed to pay for gas".to_string()
            }
            FailureReason::ContractMissing => {
                "No contract is deployed at the configured address".to_string()
            }
            FailureReason::Reverted { reason: Some(reason) } => {
                format!("The contract rejected the transaction: {}", reason)
            }
            FailureReason::Reverted { reason: None } => {
                "The contract rejected the transaction".to_string()
            }
            FailureReason::NodeError => {
                "Internal RPC node error. The contract may not exist or may be misbehaving."
                    .to_string()
            }
            FailureReason::ContractError => {
                "Problem with the contract. Check the address.".to_string()
            }
            FailureReason::Unclassified => "Failed to create the certificate".to_string(),
        }
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            FailureReason::UserRejected => "user_rejected",
            FailureReason::InsufficientFunds => "insufficient_funds",
            FailureReason::BalanceBelowMinimum => "balance_below_minimum",
            FailureReason::ContractMissing => "contract_missing",
            FailureReason::Reverted { .. } => "reverted",
            FailureReason::NodeError => "node_error",
            FailureReason::ContractError => "contract_error",
            FailureReason::Unclassified => "unclassified",
        }
    }
}

/// Anything that ends a submission after the guard checks passed.
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("No contract deployed at {address}")]
    ContractMissing { address: Address },

    #[error("Balance {balance} wei is below the required minimum of {minimum} wei")]
    BalanceBelowMinimum { balance: U256, minimum: U256 },

    #[error("Transaction {tx_hash} reverted on-chain")]
    RevertedOnChain { tx_hash: TxHash },
}

impl SubmissionError {
    pub fn classify(&self) -> FailureReason {
        match self {
            SubmissionError::Provider(e) => classify_provider_error(e),
            SubmissionError::ContractMissing { .. } => FailureReason::ContractMissing,
            SubmissionError::BalanceBelowMinimum { .. } => FailureReason::BalanceBelowMinimum,
            SubmissionError::RevertedOnChain { .. } => FailureReason::Reverted { reason: None },
        }
    }
}

/// Classify a provider error by code first, then by message text.
pub fn classify_provider_error(err: &ProviderError) -> FailureReason {
    if err.is_user_rejection() {
        return FailureReason::UserRejected;
    }

    let message = err.message.to_lowercase();
    if message.contains("insufficient funds") {
        return FailureReason::InsufficientFunds;
    }
    if is_revert(err, &message) {
        return FailureReason::Reverted {
            reason: revert_reason(err),
        };
    }
    if message.contains("internal json-rpc error") || err.code == ProviderError::INTERNAL {
        return FailureReason::NodeError;
    }
    if message.contains("contract") {
        return FailureReason::ContractError;
    }
    FailureReason::Unclassified
}

fn is_revert(err: &ProviderError, message: &str) -> bool {
    message.contains("execution reverted")
        || err.code == EXECUTION_REVERTED_CODE
        || nested_message(err).is_some_and(|m| m.to_lowercase().contains("execution reverted"))
}

/// Extract a revert reason from ABI-encoded revert data, or from the text
/// after `execution reverted:`.
pub fn revert_reason(err: &ProviderError) -> Option<String> {
    if let Some(reason) = err
        .data
        .as_deref()
        .and_then(revert_data_hex)
        .and_then(|data| hex::decode(data).ok())
        .filter(|bytes| !bytes.is_empty())
        .and_then(|bytes| decode_revert_data(&bytes))
        .filter(|reason| !reason.trim().is_empty())
    {
        return Some(reason);
    }

    std::iter::once(err.message.clone())
        .chain(nested_message(err))
        .find_map(|message| reason_from_message(&message))
}

/// Prefer the plain `Error(string)` reason; fall back to alloy's generic decoder
/// for panics and custom errors.
fn decode_revert_data(bytes: &[u8]) -> Option<String> {
    match Revert::abi_decode(bytes) {
        Ok(revert) => Some(revert.reason),
        Err(_) => decode_revert_reason(bytes),
    }
}

fn reason_from_message(message: &str) -> Option<String> {
    let lower = message.to_ascii_lowercase();
    let idx = lower.find("execution reverted:")?;
    let reason = message[idx + "execution reverted:".len()..].trim();
    (!reason.is_empty()).then(|| reason.to_string())
}

/// Wallets put revert data either directly in `data` or one level down in
/// `data.data` (MetaMask wraps node errors that way).
fn revert_data_hex(raw: &str) -> Option<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => find_hex(&value).map(str::to_string),
        Err(_) => raw.starts_with("0x").then(|| raw.to_string()),
    }
}

fn find_hex(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if s.starts_with("0x") => Some(s),
        Value::Object(map) => map.get("data").and_then(find_hex),
        _ => None,
    }
}

fn nested_message(err: &ProviderError) -> Option<String> {
    let value: Value = serde_json::from_str(err.data.as_deref()?).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
