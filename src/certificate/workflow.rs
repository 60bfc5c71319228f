//! The certificate submission workflow.
//!
//! # Steps
//! 1. Guard: connected, on the target chain, all fields filled
//! 2. Optional pre-flight: contract code present, balance above minimum
//! 3. Gas estimate
//! 4. Send with the estimate plus the configured margin, wait for the receipt
//! 5. Extract the certificate ID
//!
//! Every failure after the guard is terminal for the attempt and is returned
//! as a classified [`SubmissionResult::Failed`]. Nothing is retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::Instrument;
use uuid::Uuid;

use crate::certificate::classify::SubmissionError;
use crate::certificate::contract::create_certificate_call;
use crate::certificate::extract::extract_certificate_id;
use crate::certificate::outcome::{
    ConfirmedSubmission, SimulatedSubmission, SubmissionFailure, SubmissionResult,
};
use crate::certificate::request::{CertificateRequest, PreconditionError};
use crate::config::{IssuerConfig, SubmissionConfig};
use crate::observability::metrics;
use crate::wallet::{ChainId, Session, WalletProvider};

/// Submits `createCertificate` transactions through a wallet provider.
pub struct CertificateIssuer<P: WalletProvider + ?Sized> {
    provider: Arc<P>,
    contract: Address,
    target: ChainId,
    settings: SubmissionConfig,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the attempt ends, including when the
/// submission future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<P: WalletProvider + ?Sized> CertificateIssuer<P> {
    pub fn new(
        provider: Arc<P>,
        contract: Address,
        target: ChainId,
        settings: SubmissionConfig,
    ) -> Self {
        Self {
            provider,
            contract,
            target,
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn from_config(provider: Arc<P>, config: &IssuerConfig) -> Self {
        Self::new(
            provider,
            config.contract.address,
            config.network.chain(),
            config.submission.clone(),
        )
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Whether an attempt is currently running.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Check the guard conditions. Returns the sender address on success.
    pub fn check_preconditions(
        &self,
        session: &Session,
        request: &CertificateRequest,
    ) -> Result<Address, PreconditionError> {
        let sender = session.address.ok_or(PreconditionError::NotConnected)?;

        if !session.is_target_chain(self.target) {
            return Err(PreconditionError::WrongNetwork {
                expected: self.target,
                actual: session.chain_id,
            });
        }

        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(PreconditionError::MissingFields(missing));
        }

        Ok(sender)
    }

    /// Gas limit for an estimate: estimate plus the configured margin.
    pub fn gas_limit(&self, estimate: u64) -> u64 {
        let factor = 100 + u128::from(self.settings.gas_margin_percent);
        let scaled = u128::from(estimate).saturating_mul(factor) / 100;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Run one submission attempt.
    ///
    /// Guard failures, including a second attempt while one is running, are
    /// returned as `Err` and never reach the provider. Everything else ends
    /// up in the returned [`SubmissionResult`].
    pub async fn submit(
        &self,
        session: &Session,
        request: &CertificateRequest,
    ) -> Result<SubmissionResult, PreconditionError> {
        let sender = self.check_preconditions(session, request)?;
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PreconditionError::AlreadySubmitting);
        }
        let _in_flight = InFlight(&self.in_flight);

        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "certificate_submission",
            %attempt_id,
            sender = %sender,
            contract = %self.contract
        );

        let result = match self.execute(attempt_id, sender, request).instrument(span).await {
            Ok(result) => result,
            Err(error) => {
                let failure = SubmissionFailure::from_error(attempt_id, &error);
                tracing::warn!(
                    %attempt_id,
                    reason = failure.reason.label(),
                    error = %failure.raw_message,
                    "Certificate submission failed"
                );
                metrics::record_failure_reason(failure.reason.label());
                SubmissionResult::Failed(failure)
            }
        };

        metrics::record_submission(result.label());
        Ok(result)
    }

    async fn execute(
        &self,
        attempt_id: Uuid,
        sender: Address,
        request: &CertificateRequest,
    ) -> Result<SubmissionResult, SubmissionError> {
        tracing::info!(
            recipient = %request.recipient_name,
            event = %request.event_name,
            "Starting certificate submission"
        );

        if self.settings.check_contract_code {
            let code = self.provider.get_code(self.contract).await?;
            if code.is_empty() {
                return Err(SubmissionError::ContractMissing {
                    address: self.contract,
                });
            }
            tracing::debug!(code_len = code.len(), "Contract code present");
        }

        if self.settings.check_balance {
            let balance = self.provider.get_balance(sender).await?;
            let minimum = U256::from(self.settings.min_balance_wei);
            if balance < minimum {
                return Err(SubmissionError::BalanceBelowMinimum { balance, minimum });
            }
            tracing::debug!(%balance, "Sender balance sufficient");
        }

        let call = create_certificate_call(self.contract, sender, request);

        let estimate = match self.provider.estimate_gas(&call).await {
            Ok(estimate) => estimate,
            Err(e) if self.settings.simulate_on_estimate_failure => {
                tracing::warn!(
                    error = %e,
                    "Gas estimation failed, returning a SIMULATED result (development mode)"
                );
                return Ok(SubmissionResult::Simulated(SimulatedSubmission::fabricate(
                    attempt_id,
                    e.to_string(),
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let gas_limit = self.gas_limit(estimate);
        tracing::info!(estimate, gas_limit, "Gas estimated, sending transaction");

        let receipt = self.provider.send_transaction(&call, gas_limit).await?;
        if !receipt.status {
            return Err(SubmissionError::RevertedOnChain {
                tx_hash: receipt.transaction_hash,
            });
        }

        let certificate_id = extract_certificate_id(&receipt, self.contract, request, sender);
        tracing::info!(
            tx_hash = %receipt.transaction_hash,
            block_number = ?receipt.block_number,
            certificate_id = %certificate_id.value,
            source = ?certificate_id.source,
            "Certificate transaction confirmed"
        );

        Ok(SubmissionResult::Confirmed(ConfirmedSubmission {
            attempt_id,
            transaction_hash: receipt.transaction_hash,
            certificate_id,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }))
    }
}
