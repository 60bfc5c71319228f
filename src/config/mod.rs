//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → IssuerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Every field has a default; the defaults are the built-in deployment
//!   constants in constants.rs
//! - Validation separates syntactic (serde) from semantic checks

pub mod constants;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    ContractConfig, IssuerConfig, NetworkConfig, ObservabilityConfig, SubmissionConfig,
    WalletConfig,
};
