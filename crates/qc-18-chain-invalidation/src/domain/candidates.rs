//! Block index candidates
//!
//! The set of blocks that could become the active chain tip, ordered so
//! that the most-work block is the maximum. Membership invariant, held
//! between public operations of the service:
//!
//! - transactions valid and full transaction data present
//! - not flagged `FAILED_VALID` or `FAILED_CHILD`
//! - chain work not below the active tip's chain work
//!
//! The set has no internal locking; it is only mutated through a
//! [`super::Chainstate`] held under the consensus lock.

use super::BlockIndexEntry;
use shared_types::{Hash, U256};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Sort key for a candidate.
///
/// Greater means better: more chain work wins, then the earlier arrival
/// (lower sequence id), then the hash as a deterministic last resort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateKey {
    pub chain_work: U256,
    pub sequence_id: u64,
    pub hash: Hash,
}

impl From<&BlockIndexEntry> for CandidateKey {
    fn from(entry: &BlockIndexEntry) -> Self {
        Self {
            chain_work: entry.chain_work(),
            sequence_id: entry.sequence_id(),
            hash: *entry.hash(),
        }
    }
}

impl Ord for CandidateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chain_work
            .cmp(&other.chain_work)
            .then_with(|| other.sequence_id.cmp(&self.sequence_id))
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for CandidateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered set of chain tip candidates.
#[derive(Debug, Default)]
pub struct BlockIndexCandidates {
    ordered: BTreeSet<CandidateKey>,
    /// hash → key, so `erase` does not need the entry.
    keys: HashMap<Hash, CandidateKey>,
}

impl BlockIndexCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate. Re-inserting an unchanged entry is a no-op.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, entry: &BlockIndexEntry) -> bool {
        let key = CandidateKey::from(entry);
        match self.keys.insert(*entry.hash(), key) {
            Some(previous) if previous == key => false,
            Some(previous) => {
                self.ordered.remove(&previous);
                self.ordered.insert(key)
            }
            None => self.ordered.insert(key),
        }
    }

    /// Remove a candidate if present. Returns `true` if it was present.
    pub fn erase(&mut self, hash: &Hash) -> bool {
        match self.keys.remove(hash) {
            Some(key) => self.ordered.remove(&key),
            None => false,
        }
    }

    /// The most-work candidate, or `None` if there is no known candidate chain.
    pub fn best(&self) -> Option<Hash> {
        self.ordered.last().map(|key| key.hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.keys.contains_key(hash)
    }

    /// Candidates from best to worst.
    pub fn iter(&self) -> impl Iterator<Item = &CandidateKey> {
        self.ordered.iter().rev()
    }

    pub fn clear(&mut self) {
        self.ordered.clear();
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(tag: u8, work: u64, sequence_id: u64) -> BlockIndexEntry {
        let mut entry = BlockIndexEntry::new([tag; 32], 1, None, U256::from(work), 0);
        entry.set_sequence_id(sequence_id);
        entry
    }

    #[test]
    fn test_best_is_most_work() {
        let mut set = BlockIndexCandidates::new();
        set.insert(&candidate(1, 10, 0));
        set.insert(&candidate(2, 30, 1));
        set.insert(&candidate(3, 20, 2));

        assert_eq!(set.best(), Some([2; 32]));
        let order: Vec<Hash> = set.iter().map(|k| k.hash).collect();
        assert_eq!(order, vec![[2; 32], [3; 32], [1; 32]]);
    }

    #[test]
    fn test_equal_work_prefers_earlier_arrival() {
        let mut set = BlockIndexCandidates::new();
        set.insert(&candidate(9, 50, 7));
        set.insert(&candidate(1, 50, 3));

        assert_eq!(set.best(), Some([1; 32]));
    }

    #[test]
    fn test_empty_set_has_no_best() {
        let set = BlockIndexCandidates::new();
        assert!(set.is_empty());
        assert_eq!(set.best(), None);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = BlockIndexCandidates::new();
        let entry = candidate(1, 10, 0);

        assert!(set.insert(&entry));
        assert!(!set.insert(&entry));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_erase_absent_is_not_an_error() {
        let mut set = BlockIndexCandidates::new();
        set.insert(&candidate(1, 10, 0));

        assert!(!set.erase(&[2; 32]));
        assert!(set.erase(&[1; 32]));
        assert!(!set.erase(&[1; 32]));
        assert!(set.is_empty());
    }

    #[test]
    fn test_reinsert_with_new_key_replaces() {
        let mut set = BlockIndexCandidates::new();
        set.insert(&candidate(1, 10, 0));
        set.insert(&candidate(2, 20, 1));

        assert!(set.insert(&candidate(1, 40, 0)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.best(), Some([1; 32]));
    }
}
