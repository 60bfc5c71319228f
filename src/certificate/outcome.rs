//! Submission results.

use alloy::primitives::{TxHash, B256};
use serde::Serialize;
use uuid::Uuid;

use crate::certificate::classify::{FailureReason, SubmissionError};
use crate::certificate::extract::CertificateId;

/// A real, mined certificate transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedSubmission {
    pub attempt_id: Uuid,
    pub transaction_hash: TxHash,
    pub certificate_id: CertificateId,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// A fabricated stand-in produced in development mode when gas estimation
/// fails. Nothing was sent to the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedSubmission {
    pub attempt_id: Uuid,
    pub transaction_hash: B256,
    pub certificate_id: B256,
    pub block_number: u64,
    /// The estimation error that triggered the simulation.
    pub estimate_error: String,
}

impl SimulatedSubmission {
    /// Random hash, random ID, random block number.
    pub fn fabricate(attempt_id: Uuid, estimate_error: String) -> Self {
        Self {
            attempt_id,
            transaction_hash: random_b256(),
            certificate_id: random_b256(),
            block_number: fastrand::u64(..1_000_000),
            estimate_error,
        }
    }
}

fn random_b256() -> B256 {
    let mut bytes = [0u8; 32];
    fastrand::fill(&mut bytes);
    B256::from(bytes)
}

/// A classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFailure {
    pub attempt_id: Uuid,
    pub raw_message: String,
    pub reason: FailureReason,
}

impl SubmissionFailure {
    pub fn from_error(attempt_id: Uuid, error: &SubmissionError) -> Self {
        Self {
            attempt_id,
            raw_message: error.to_string(),
            reason: error.classify(),
        }
    }

    /// What to show the user. Unclassified errors surface the raw message.
    pub fn message(&self) -> String {
        match self.reason {
            FailureReason::Unclassified => self.raw_message.clone(),
            ref reason => reason.user_message(),
        }
    }
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionResult {
    Confirmed(ConfirmedSubmission),
    Simulated(SimulatedSubmission),
    Failed(SubmissionFailure),
}

impl SubmissionResult {
    pub fn attempt_id(&self) -> Uuid {
        match self {
            SubmissionResult::Confirmed(c) => c.attempt_id,
            SubmissionResult::Simulated(s) => s.attempt_id,
            SubmissionResult::Failed(f) => f.attempt_id,
        }
    }

    /// Confirmed or simulated. Check [`Self::is_confirmed`] before trusting it.
    pub fn is_success(&self) -> bool {
        !matches!(self, SubmissionResult::Failed(_))
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmissionResult::Confirmed(_))
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, SubmissionResult::Simulated(_))
    }

    /// One-line summary for display.
    pub fn headline(&self) -> String {
        match self {
            SubmissionResult::Confirmed(_) => "Certificate created successfully".to_string(),
            SubmissionResult::Simulated(_) => {
                "Certificate SIMULATED (development mode): nothing was sent to the chain"
                    .to_string()
            }
            SubmissionResult::Failed(failure) => failure.message(),
        }
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionResult::Confirmed(_) => "confirmed",
            SubmissionResult::Simulated(_) => "simulated",
            SubmissionResult::Failed(_) => "failed",
        }
    }
}
