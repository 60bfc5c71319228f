//! Certificate issuer library.
//!
//! Connects a wallet, moves it to the target network and issues
//! certificates through the registry contract.

pub mod blockchain;
pub mod certificate;
pub mod config;
pub mod observability;
pub mod wallet;

pub use blockchain::LocalWallet;
pub use certificate::{CertificateIssuer, IssuerForm, SubmissionResult};
pub use config::IssuerConfig;
pub use wallet::{SessionManager, WalletProvider};
