//! Outcome counters.
//!
//! # Metrics
//! - `certificate_submissions_total` (counter): submissions by outcome
//!   (`confirmed`, `simulated`, `failed`)
//! - `certificate_submission_failures_total` (counter): failures by reason
//! - `wallet_network_switch_total` (counter): switch requests by result

use metrics::counter;

/// Record a finished submission attempt.
pub fn record_submission(outcome: &'static str) {
    counter!("certificate_submissions_total", "outcome" => outcome).increment(1);
}

/// Record the classified reason of a failed submission.
pub fn record_failure_reason(reason: &'static str) {
    counter!("certificate_submission_failures_total", "reason" => reason).increment(1);
}

/// Record a network switch attempt.
pub fn record_network_switch(result: &'static str) {
    counter!("wallet_network_switch_total", "result" => result).increment(1);
}
