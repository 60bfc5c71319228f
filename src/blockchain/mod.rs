//! Headless wallet subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variable (private key) + IssuerConfig networks
//!     → signer.rs (key loading)
//!     → client.rs (RPC per network, timeouts, failover)
//!     → transaction.rs (call/receipt conversion)
//!     → wallet.rs (LocalWallet: WalletProvider implementation)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod signer;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use signer::SigningKey;
pub use types::{BlockchainError, BlockchainResult};
pub use wallet::LocalWallet;
