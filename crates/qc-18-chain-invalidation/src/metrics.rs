//! # Invalidation Metrics
//!
//! Prometheus metrics for monitoring block invalidation.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-chain-invalidation = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `invalidation_blocks_invalidated_total` - Blocks flagged `FAILED_VALID`
//! - `invalidation_blocks_disconnected_total` - Tips rolled back during invalidation
//! - `invalidation_rollback_failures_total` - Failed tip disconnects
//! - `invalidation_peers_penalized_total` - Misbehavior penalties issued
//! - `invalidation_candidate_set_size` - Candidate count after the last rebuild

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_gauge, IntCounter, IntGauge};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref BLOCKS_INVALIDATED: IntCounter = register_int_counter!(
        "invalidation_blocks_invalidated_total",
        "Total number of blocks flagged invalid"
    )
    .expect("Failed to create BLOCKS_INVALIDATED metric");

    pub static ref BLOCKS_DISCONNECTED: IntCounter = register_int_counter!(
        "invalidation_blocks_disconnected_total",
        "Total number of tips disconnected while invalidating"
    )
    .expect("Failed to create BLOCKS_DISCONNECTED metric");

    pub static ref ROLLBACK_FAILURES: IntCounter = register_int_counter!(
        "invalidation_rollback_failures_total",
        "Total number of failed tip disconnects"
    )
    .expect("Failed to create ROLLBACK_FAILURES metric");

    pub static ref PEERS_PENALIZED: IntCounter = register_int_counter!(
        "invalidation_peers_penalized_total",
        "Total number of misbehavior penalties for invalid blocks"
    )
    .expect("Failed to create PEERS_PENALIZED metric");

    pub static ref CANDIDATE_SET_SIZE: IntGauge = register_int_gauge!(
        "invalidation_candidate_set_size",
        "Number of chain tip candidates after the last rebuild"
    )
    .expect("Failed to create CANDIDATE_SET_SIZE metric");
}

/// Record a block newly flagged `FAILED_VALID`.
#[cfg(feature = "metrics")]
pub fn record_block_invalidated() {
    BLOCKS_INVALIDATED.inc();
}

/// Record one tip disconnected during rollback.
#[cfg(feature = "metrics")]
pub fn record_block_disconnected() {
    BLOCKS_DISCONNECTED.inc();
}

/// Record a rollback aborted by a failed disconnect.
#[cfg(feature = "metrics")]
pub fn record_rollback_failure() {
    ROLLBACK_FAILURES.inc();
}

/// Record a misbehavior penalty applied to a peer.
#[cfg(feature = "metrics")]
pub fn record_peer_penalized() {
    PEERS_PENALIZED.inc();
}

/// Record the candidate set size after a rebuild.
#[cfg(feature = "metrics")]
pub fn record_candidate_set_size(size: usize) {
    CANDIDATE_SET_SIZE.set(i64::try_from(size).unwrap_or(i64::MAX));
}

// No-op implementations when metrics feature is disabled
#[cfg(not(feature = "metrics"))]
pub fn record_block_invalidated() {}

#[cfg(not(feature = "metrics"))]
pub fn record_block_disconnected() {}

#[cfg(not(feature = "metrics"))]
pub fn record_rollback_failure() {}

#[cfg(not(feature = "metrics"))]
pub fn record_peer_penalized() {}

#[cfg(not(feature = "metrics"))]
pub fn record_candidate_set_size(_size: usize) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_when_disabled() {
        record_block_invalidated();
        record_block_disconnected();
        record_rollback_failure();
        record_peer_penalized();
        record_candidate_set_size(3);
    }
}
