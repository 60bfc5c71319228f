//! Certificate registry contract bindings.

use std::sync::Arc;

use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Serialize;
use thiserror::Error;

use crate::certificate::request::CertificateRequest;
use crate::wallet::{ContractCall, ProviderError, WalletProvider};

sol! {
    interface ICertificateRegistry {
        /// Emitted when a certificate is issued.
        #[derive(Debug, PartialEq, Eq)]
        event CertificateCreated(
            bytes32 indexed certificateId,
            address indexed issuer,
            string recipientName,
            string eventName
        );

        function createCertificate(
            string recipientName,
            string eventName,
            string arweaveHash
        ) external returns (bytes32);

        function getCertificate(bytes32 certificateId) external view returns (
            address issuer,
            string recipientName,
            string eventName,
            string arweaveHash,
            uint256 issueDate,
            bool isActive
        );

        function verifyCertificate(bytes32 certificateId) external view returns (bool);
    }
}

pub use ICertificateRegistry::CertificateCreated;

/// Build the `createCertificate` write call for a request.
pub fn create_certificate_call(
    contract: Address,
    from: Address,
    request: &CertificateRequest,
) -> ContractCall {
    let call = ICertificateRegistry::createCertificateCall {
        recipientName: request.recipient_name.clone(),
        eventName: request.event_name.clone(),
        arweaveHash: request.content_hash.clone(),
    };
    ContractCall {
        from,
        to: contract,
        input: call.abi_encode().into(),
    }
}

/// A certificate as stored on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    pub certificate_id: B256,
    pub issuer: Address,
    pub recipient_name: String,
    pub event_name: String,
    pub content_hash: String,
    pub issue_date: U256,
    pub is_active: bool,
}

/// Errors from registry reads.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to decode contract response: {0}")]
    Decode(#[from] alloy::sol_types::Error),
}

/// Read access to the registry. The submission path does not use it.
pub struct CertificateRegistry<P: WalletProvider + ?Sized> {
    provider: Arc<P>,
    address: Address,
}

impl<P: WalletProvider + ?Sized> CertificateRegistry<P> {
    pub fn new(provider: Arc<P>, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Fetch the full record for `certificate_id`.
    pub async fn get_certificate(
        &self,
        certificate_id: B256,
    ) -> Result<CertificateRecord, RegistryError> {
        let call = ICertificateRegistry::getCertificateCall {
            certificateId: certificate_id,
        };
        let output = self.provider.call(&self.read_call(call.abi_encode())).await?;
        let decoded = ICertificateRegistry::getCertificateCall::abi_decode_returns(&output)?;

        Ok(CertificateRecord {
            certificate_id,
            issuer: decoded.issuer,
            recipient_name: decoded.recipientName,
            event_name: decoded.eventName,
            content_hash: decoded.arweaveHash,
            issue_date: decoded.issueDate,
            is_active: decoded.isActive,
        })
    }

    /// Whether `certificate_id` exists and is valid.
    pub async fn verify_certificate(&self, certificate_id: B256) -> Result<bool, RegistryError> {
        let call = ICertificateRegistry::verifyCertificateCall {
            certificateId: certificate_id,
        };
        let output = self.provider.call(&self.read_call(call.abi_encode())).await?;
        Ok(ICertificateRegistry::verifyCertificateCall::abi_decode_returns(&output)?)
    }

    fn read_call(&self, input: Vec<u8>) -> ContractCall {
        ContractCall {
            from: Address::ZERO,
            to: self.address,
            input: input.into(),
        }
    }
}
