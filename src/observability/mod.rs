//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! wallet session + submission workflow produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (outcome counters)
//! ```
//!
//! # Design Decisions
//! - Structured fields (address, chain id, tx hash), never private keys
//! - Metrics go through the `metrics` facade; no exporter is installed by
//!   default, so recording is a no-op until an embedding application adds one

pub mod logging;
pub mod metrics;
