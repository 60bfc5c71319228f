//! Certificate issuing against the registry contract.
//!
//! [`CertificateIssuer`] runs one submission: guard checks, pre-flight,
//! gas estimate, send, and ID extraction. [`IssuerForm`] wraps it with the
//! session and input state a front end needs.

pub mod classify;
pub mod contract;
pub mod extract;
pub mod form;
pub mod outcome;
pub mod request;
pub mod workflow;

pub use classify::{FailureReason, SubmissionError};
pub use contract::{CertificateRecord, CertificateRegistry, RegistryError};
pub use extract::{CertificateId, IdSource};
pub use form::{IssuerForm, Phase};
pub use outcome::{ConfirmedSubmission, SimulatedSubmission, SubmissionFailure, SubmissionResult};
pub use request::{CertificateRequest, Field, PreconditionError};
pub use workflow::CertificateIssuer;
