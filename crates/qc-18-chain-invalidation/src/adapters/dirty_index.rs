use crate::domain::BlockIndexEntry;
use crate::ports::DirtyIndexRecorder;
use parking_lot::Mutex;
use shared_types::Hash;
use std::collections::HashSet;

/// Set of block index entries awaiting persistence.
///
/// The block-file layer drains it with [`InMemoryDirtyIndex::take_dirty`]
/// when it flushes.
#[derive(Debug, Default)]
pub struct InMemoryDirtyIndex {
    dirty: Mutex<HashSet<Hash>>,
}

impl InMemoryDirtyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the pending hashes, sorted for deterministic flush order.
    pub fn take_dirty(&self) -> Vec<Hash> {
        let mut hashes: Vec<Hash> = self.dirty.lock().drain().collect();
        hashes.sort_unstable();
        hashes
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.dirty.lock().contains(hash)
    }

    pub fn len(&self) -> usize {
        self.dirty.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.lock().is_empty()
    }
}

impl DirtyIndexRecorder for InMemoryDirtyIndex {
    fn record_dirty(&self, entry: &BlockIndexEntry) {
        self.dirty.lock().insert(*entry.hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::U256;

    #[test]
    fn test_records_are_deduplicated_and_drained() {
        let index = InMemoryDirtyIndex::new();
        let a = BlockIndexEntry::new([2; 32], 0, None, U256::one(), 0);
        let b = BlockIndexEntry::new([1; 32], 0, None, U256::one(), 0);

        index.record_dirty(&a);
        index.record_dirty(&a);
        index.record_dirty(&b);
        assert_eq!(index.len(), 2);

        assert_eq!(index.take_dirty(), vec![[1; 32], [2; 32]]);
        assert!(index.is_empty());
    }
}
