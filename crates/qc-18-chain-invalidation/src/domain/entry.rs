//! Block index entries
//!
//! One in-memory record per known block: header identity, cumulative work
//! and validation status. Entries are owned by the [`super::BlockMap`];
//! everything else refers to them by hash.

use super::BlockStatus;
use serde::{Deserialize, Serialize};
use shared_types::{Hash, U256};

/// 2^64 as f64, for folding U256 limbs.
const LIMB_BASE: f64 = 18_446_744_073_709_551_616.0;

/// In-memory metadata record for one known block.
///
/// Identity and work are fixed at construction. Status only changes through
/// the `mark_*` methods, none of which can clear a failure flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIndexEntry {
    /// Block hash (unique key in the block map).
    hash: Hash,
    /// Height in the block tree (genesis = 0).
    height: u64,
    /// Parent hash. Back-reference only, `None` for genesis.
    parent: Option<Hash>,
    /// Cumulative chain work up to and including this block.
    chain_work: U256,
    /// Block timestamp (unix seconds).
    timestamp: u64,
    /// Arrival order, assigned by the block map. Lower is earlier.
    sequence_id: u64,
    status: BlockStatus,
    /// Status changed and must be persisted by the block-file layer.
    dirty: bool,
}

impl BlockIndexEntry {
    pub fn new(
        hash: Hash,
        height: u64,
        parent: Option<Hash>,
        chain_work: U256,
        timestamp: u64,
    ) -> Self {
        Self {
            hash,
            height,
            parent,
            chain_work,
            timestamp,
            sequence_id: 0,
            status: BlockStatus::default(),
            dirty: false,
        }
    }

    /// Set the initial validation status, before the entry is stored.
    pub fn with_status(mut self, status: BlockStatus) -> Self {
        self.status = status;
        self
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn parent(&self) -> Option<&Hash> {
        self.parent.as_ref()
    }

    pub fn chain_work(&self) -> U256 {
        self.chain_work
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    pub(crate) fn set_sequence_id(&mut self, sequence_id: u64) {
        self.sequence_id = sequence_id;
    }

    pub fn status(&self) -> BlockStatus {
        self.status
    }

    /// See [`BlockStatus::mark_failed_valid`].
    pub fn mark_failed_valid(&mut self) -> bool {
        self.status.mark_failed_valid()
    }

    /// See [`BlockStatus::mark_failed_child`].
    pub fn mark_failed_child(&mut self) -> bool {
        self.status.mark_failed_child()
    }

    pub fn mark_transactions_valid(&mut self) {
        self.status.mark_transactions_valid();
    }

    pub fn mark_has_tx_data(&mut self) {
        self.status.mark_has_tx_data();
    }

    pub fn is_genesis(&self) -> bool {
        self.parent.is_none()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the persistence layer once the entry has been flushed.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// log2 of the cumulative chain work, for logs.
    pub fn log2_work(&self) -> f64 {
        log2_work(&self.chain_work)
    }
}

/// Approximate a 256-bit work value as f64.
pub fn work_to_f64(work: &U256) -> f64 {
    work.0
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * LIMB_BASE + *limb as f64)
}

/// log2 of a work value. Zero work yields negative infinity.
pub fn log2_work(work: &U256) -> f64 {
    work_to_f64(work).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2_work_small_values() {
        assert_eq!(log2_work(&U256::from(1u64)), 0.0);
        assert_eq!(log2_work(&U256::from(1024u64)), 10.0);
    }

    #[test]
    fn test_log2_work_spans_limbs() {
        let work = U256::from(2u64).pow(U256::from(100u64));
        assert!((log2_work(&work) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_dirty_marker() {
        let mut entry = BlockIndexEntry::new([1; 32], 0, None, U256::from(1u64), 0);
        assert!(entry.is_genesis());
        assert!(!entry.is_dirty());

        entry.mark_dirty();
        assert!(entry.is_dirty());

        entry.clear_dirty();
        assert!(!entry.is_dirty());
    }

    #[test]
    fn test_revalidation_does_not_clear_failure() {
        let mut entry = BlockIndexEntry::new([1; 32], 0, None, U256::from(1u64), 0)
            .with_status(BlockStatus::fully_validated());
        assert!(entry.mark_failed_valid());

        entry.mark_transactions_valid();
        entry.mark_has_tx_data();

        assert!(entry.status().failed_valid());
        assert!(!entry.status().is_candidate_eligible());
    }
}
