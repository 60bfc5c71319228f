//! Certificate ID extraction from a mined receipt.
//!
//! Steps, first hit wins:
//! 1. a `CertificateCreated` log emitted by the registry, decoded against
//!    the known schema
//! 2. the first indexed argument of any other log emitted by the registry
//! 3. a locally derived hash of the inputs, block number and sender
//! 4. the transaction hash itself, as a reference

use alloy::primitives::{keccak256, Address, Log, B256, U256};
use alloy::sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::certificate::contract::CertificateCreated;
use crate::certificate::request::CertificateRequest;
use crate::wallet::SubmissionReceipt;

/// Which extraction step produced the ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSource {
    Event,
    IndexedTopic,
    /// Recomputed locally; may not match what the contract stored.
    Derived,
    /// No ID available; this is the transaction hash.
    TransactionReference,
}

/// A certificate ID together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateId {
    pub value: B256,
    pub source: IdSource,
}

impl CertificateId {
    /// Whether the ID was read from the chain rather than guessed.
    pub fn is_on_chain(&self) -> bool {
        matches!(self.source, IdSource::Event | IdSource::IndexedTopic)
    }
}

/// Decode the first `CertificateCreated` log emitted by `contract`, if any.
pub fn decode_certificate_created(logs: &[Log], contract: Address) -> Option<CertificateCreated> {
    logs.iter()
        .filter(|log| log.address == contract)
        .filter(|log| log.topics().first() == Some(&CertificateCreated::SIGNATURE_HASH))
        .find_map(|log| CertificateCreated::decode_log_data(&log.data).ok())
}

/// First indexed argument of any log emitted by `contract`.
pub fn first_indexed_topic(logs: &[Log], contract: Address) -> Option<B256> {
    logs.iter()
        .filter(|log| log.address == contract)
        .find_map(|log| log.topics().get(1).copied())
}

/// keccak256(recipient ‖ event ‖ hash ‖ uint256(block) ‖ sender), packed.
pub fn derive_certificate_id(
    request: &CertificateRequest,
    block_number: u64,
    sender: Address,
) -> B256 {
    let mut data = Vec::new();
    data.extend_from_slice(request.recipient_name.as_bytes());
    data.extend_from_slice(request.event_name.as_bytes());
    data.extend_from_slice(request.content_hash.as_bytes());
    data.extend_from_slice(&U256::from(block_number).to_be_bytes::<32>());
    data.extend_from_slice(sender.as_slice());
    keccak256(&data)
}

/// Run the extraction steps against a receipt.
pub fn extract_certificate_id(
    receipt: &SubmissionReceipt,
    contract: Address,
    request: &CertificateRequest,
    sender: Address,
) -> CertificateId {
    if let Some(event) = decode_certificate_created(&receipt.logs, contract) {
        return CertificateId {
            value: event.certificateId,
            source: IdSource::Event,
        };
    }

    if let Some(topic) = first_indexed_topic(&receipt.logs, contract) {
        return CertificateId {
            value: topic,
            source: IdSource::IndexedTopic,
        };
    }

    if let Some(block_number) = receipt.block_number {
        tracing::debug!(
            tx_hash = %receipt.transaction_hash,
            "No certificate event in receipt, deriving ID locally"
        );
        return CertificateId {
            value: derive_certificate_id(request, block_number, sender),
            source: IdSource::Derived,
        };
    }

    CertificateId {
        value: receipt.transaction_hash,
        source: IdSource::TransactionReference,
    }
}
