//! Driving ports (Inbound API)

use crate::domain::{InvalidationError, ValidationState};
use shared_types::{Hash, PeerId};
use std::collections::HashMap;

/// Which peer relayed each block still being tracked.
pub type PeerIdByBlock = HashMap<Hash, PeerId>;

/// What an invalidation did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// The block that was invalidated.
    pub target: Hash,
    /// Blocks rolled off the active chain, tip first.
    pub disconnected: Vec<Hash>,
    /// Descendants newly flagged `FAILED_CHILD`.
    pub failed_descendants: Vec<Hash>,
    /// Candidate set size after the rebuild.
    pub candidate_count: usize,
    /// Best candidate after the rebuild.
    pub best_candidate: Option<Hash>,
}

/// What handling a peer-sourced rejection did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvalidBlockOutcome {
    /// Peer that was penalized, if any.
    pub penalized_peer: Option<PeerId>,
    /// Whether the block was permanently flagged `FAILED_VALID`.
    pub marked_failed: bool,
}

/// Primary Chain Invalidation API
///
/// Every method takes the consensus lock for its whole duration.
pub trait BlockInvalidationApi: Send + Sync {
    /// Invalidate a block, rolling the active chain off it if needed.
    fn invalidate_block(&self, hash: &Hash) -> Result<InvalidationReport, InvalidationError>;

    /// Handle a block rejected during validation.
    fn invalid_block_found(
        &self,
        peer_by_block: &PeerIdByBlock,
        hash: &Hash,
        state: &ValidationState,
    ) -> Result<InvalidBlockOutcome, InvalidationError>;

    /// Current best candidate tip.
    fn best_candidate(&self) -> Option<Hash>;

    /// Highest-work block ever found invalid.
    fn most_work_invalid(&self) -> Option<Hash>;
}
