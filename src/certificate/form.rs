//! The issuing form as a state machine.
//!
//! Owns the session manager, the three input fields and the last result.
//! Rendering is left to the caller. [`IssuerForm::phase`] says what should
//! be on screen, and [`IssuerForm::watch_phase`] follows it while a connect
//! or a submission is awaiting the wallet.
//!
//! Every read applies pending wallet notifications first, so a chain or
//! account change shows up without a submit.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::certificate::outcome::SubmissionResult;
use crate::certificate::request::{CertificateRequest, Field, PreconditionError};
use crate::certificate::workflow::CertificateIssuer;
use crate::config::IssuerConfig;
use crate::wallet::{ChainId, ConnectOutcome, SessionManager, WalletProvider, WalletResult};

/// What the form is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Disconnected,
    Connecting,
    /// Connected, but not on the target chain. The form shows a banner.
    WrongNetwork {
        expected: ChainId,
        actual: Option<ChainId>,
    },
    Idle,
    Submitting,
    /// A result is displayed until the next field edit.
    Completed,
}

pub struct IssuerForm<P: WalletProvider + ?Sized> {
    session: SessionManager<P>,
    issuer: CertificateIssuer<P>,
    request: CertificateRequest,
    last_result: Option<SubmissionResult>,
    phase: watch::Sender<Phase>,
}

impl<P: WalletProvider + ?Sized> IssuerForm<P> {
    pub fn new(provider: Arc<P>, config: &IssuerConfig) -> Self {
        Self {
            session: SessionManager::new(provider.clone(), config.network.clone()),
            issuer: CertificateIssuer::from_config(provider, config),
            request: CertificateRequest::default(),
            last_result: None,
            phase: watch::Sender::new(Phase::Disconnected),
        }
    }

    pub fn wallet(&self) -> &SessionManager<P> {
        &self.session
    }

    pub fn wallet_mut(&mut self) -> &mut SessionManager<P> {
        &mut self.session
    }

    pub fn issuer(&self) -> &CertificateIssuer<P> {
        &self.issuer
    }

    pub fn request(&self) -> &CertificateRequest {
        &self.request
    }

    pub fn last_result(&self) -> Option<&SubmissionResult> {
        self.last_result.as_ref()
    }

    /// Follow phase changes, including `Connecting` and `Submitting` while
    /// the wallet has not answered yet.
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub async fn restore(&mut self) {
        self.session.restore().await;
        self.sync();
    }

    pub async fn connect(&mut self) -> WalletResult<ConnectOutcome> {
        self.phase.send_replace(Phase::Connecting);
        let outcome = self.session.connect().await;
        self.sync();
        outcome
    }

    /// Edit a field. Dismisses any displayed result.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.request.set(field, value);
        self.last_result = None;
        self.sync();
    }

    /// Apply pending wallet notifications and publish the resulting phase.
    pub fn sync(&mut self) -> Phase {
        self.session.sync_events();
        let phase = self.current_phase();
        self.phase.send_replace(phase.clone());
        phase
    }

    pub fn phase(&mut self) -> Phase {
        self.sync()
    }

    pub fn shows_wrong_network_banner(&mut self) -> bool {
        matches!(self.sync(), Phase::WrongNetwork { .. })
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&mut self) -> bool {
        self.sync();
        !self.issuer.is_submitting() && self.session.is_ready() && self.request.is_complete()
    }

    /// Submit the current fields.
    ///
    /// Pending wallet notifications are applied first. On a confirmed or
    /// simulated result the fields are cleared; on failure they are kept.
    pub async fn submit(&mut self) -> Result<SubmissionResult, PreconditionError> {
        self.sync();
        self.issuer
            .check_preconditions(self.session.session(), &self.request)?;

        self.phase.send_replace(Phase::Submitting);
        let result = self
            .issuer
            .submit(self.session.session(), &self.request)
            .await;

        if let Ok(result) = &result {
            if result.is_success() {
                self.request.clear();
            }
            self.last_result = Some(result.clone());
        }
        self.sync();
        result
    }

    fn current_phase(&self) -> Phase {
        let session = self.session.session();
        if self.session.is_connecting() {
            return Phase::Connecting;
        }
        if !session.is_connected() {
            return Phase::Disconnected;
        }
        let target = self.session.target_chain();
        if !session.is_target_chain(target) {
            return Phase::WrongNetwork {
                expected: target,
                actual: session.chain_id,
            };
        }
        if self.issuer.is_submitting() {
            return Phase::Submitting;
        }
        if self.last_result.is_some() {
            return Phase::Completed;
        }
        Phase::Idle
    }
}
