//! Form input for a certificate and the guard checks run before submission.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wallet::ChainId;

/// One of the three required form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    RecipientName,
    EventName,
    ContentHash,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::RecipientName, Field::EventName, Field::ContentHash];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::RecipientName => "recipient name",
            Field::EventName => "event name",
            Field::ContentHash => "content hash",
        };
        f.write_str(name)
    }
}

/// The three values passed to `createCertificate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    pub recipient_name: String,
    pub event_name: String,
    /// Content-addressed hash of the certificate document (e.g. an Arweave hash).
    pub content_hash: String,
}

impl CertificateRequest {
    pub fn new(
        recipient_name: impl Into<String>,
        event_name: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            event_name: event_name.into(),
            content_hash: content_hash.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::RecipientName => &self.recipient_name,
            Field::EventName => &self.event_name,
            Field::ContentHash => &self.content_hash,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::RecipientName => &mut self.recipient_name,
            Field::EventName => &mut self.event_name,
            Field::ContentHash => &mut self.content_hash,
        };
        *slot = value.into();
    }

    /// Fields that are empty or whitespace only.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Reset all fields to empty strings.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A guard check failed; nothing was sent to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("Please switch your wallet to chain {expected}")]
    WrongNetwork {
        expected: ChainId,
        actual: Option<ChainId>,
    },

    #[error("Missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    #[error("A submission is already in progress")]
    AlreadySubmitting,
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
