//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! WalletProvider (injected: headless wallet or test fake)
//!     → session.rs (account + chain tracking, network switch/add)
//!     ← ProviderEvent notifications (accounts/chain changed)
//! ```
//!
//! # Design Decisions
//! - The provider is passed in explicitly, never looked up globally
//! - Chain changes are reconciled in place; nothing restarts
//! - Disconnect is local only

pub mod provider;
pub mod session;
pub mod types;

pub use provider::WalletProvider;
pub use session::{ConnectOutcome, Session, SessionManager};
pub use types::{
    AddChainParams, ChainId, ContractCall, NativeCurrency, ProviderError, ProviderEvent,
    ProviderResult, SubmissionReceipt, WalletError, WalletResult,
};
