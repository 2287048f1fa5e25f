//! Block validity flags
//!
//! The failure flags are monotonic: this type has setters for them but no
//! way to clear them, so once a block is known to be invalid it stays so.

use serde::{Deserialize, Serialize};

/// Validation metadata for one block index entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStatus {
    /// The block's own transactions are structurally valid.
    transactions_valid: bool,
    /// Full transaction data is present and counted.
    has_tx_data: bool,
    /// This exact block is invalid.
    failed_valid: bool,
    /// An ancestor is invalid, so this block is too.
    failed_child: bool,
}

impl BlockStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of a fully downloaded block whose transactions checked out.
    pub fn fully_validated() -> Self {
        Self {
            transactions_valid: true,
            has_tx_data: true,
            ..Self::default()
        }
    }

    pub fn mark_transactions_valid(&mut self) {
        self.transactions_valid = true;
    }

    pub fn mark_has_tx_data(&mut self) {
        self.has_tx_data = true;
    }

    /// Flag this block as invalid in its own right.
    ///
    /// Returns `true` if the flag was newly set.
    pub fn mark_failed_valid(&mut self) -> bool {
        !std::mem::replace(&mut self.failed_valid, true)
    }

    /// Flag this block as descending from an invalid block.
    ///
    /// Returns `true` if the flag was newly set.
    pub fn mark_failed_child(&mut self) -> bool {
        !std::mem::replace(&mut self.failed_child, true)
    }

    pub fn failed_valid(&self) -> bool {
        self.failed_valid
    }

    pub fn failed_child(&self) -> bool {
        self.failed_child
    }

    /// Either failure flag is set.
    pub fn is_failed(&self) -> bool {
        self.failed_valid || self.failed_child
    }

    /// Transactions are valid and the block is not flagged failed.
    ///
    /// A failed block can still carry a stale `transactions_valid` marking
    /// from before it was invalidated, so both are checked.
    pub fn is_valid_transactions(&self) -> bool {
        self.transactions_valid && !self.is_failed()
    }

    pub fn has_tx_data(&self) -> bool {
        self.has_tx_data
    }

    /// Could this block sit in the candidate set (ignoring chain work)?
    pub fn is_candidate_eligible(&self) -> bool {
        self.is_valid_transactions() && self.has_tx_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_status_is_not_eligible() {
        let status = BlockStatus::new();
        assert!(!status.is_failed());
        assert!(!status.is_candidate_eligible());
    }

    #[test]
    fn test_fully_validated_is_eligible() {
        let status = BlockStatus::fully_validated();
        assert!(status.is_valid_transactions());
        assert!(status.is_candidate_eligible());
    }

    #[test]
    fn test_failure_flags_are_sticky() {
        let mut status = BlockStatus::fully_validated();

        assert!(status.mark_failed_child());
        assert!(!status.mark_failed_child(), "second set is a no-op");
        assert!(status.mark_failed_valid());

        assert!(status.failed_child());
        assert!(status.failed_valid());
        assert!(status.is_failed());

        // Re-marking the validity bits does not resurrect the block
        status.mark_transactions_valid();
        status.mark_has_tx_data();
        assert!(!status.is_valid_transactions());
        assert!(!status.is_candidate_eligible());
    }

    #[test]
    fn test_missing_tx_data_is_not_eligible() {
        let mut status = BlockStatus::new();
        status.mark_transactions_valid();
        assert!(status.is_valid_transactions());
        assert!(!status.is_candidate_eligible());
    }
}
