//! Block map: the universe of known blocks
//!
//! Owns every [`BlockIndexEntry`]. Entries are added by block acceptance
//! and never removed; invalidation only touches their status and dirty
//! markers.

use super::{BlockIndexEntry, ChainResult, InvalidationError};
use shared_types::Hash;
use std::collections::HashMap;

/// Mapping from block hash to its owned index entry.
#[derive(Debug, Default)]
pub struct BlockMap {
    entries: HashMap<Hash, BlockIndexEntry>,
    next_sequence_id: u64,
}

impl BlockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry, assigning its arrival sequence id.
    ///
    /// A hash can only be inserted once.
    pub fn insert(&mut self, mut entry: BlockIndexEntry) -> ChainResult<()> {
        let hash = *entry.hash();
        if self.entries.contains_key(&hash) {
            return Err(InvalidationError::DuplicateBlock(hash));
        }
        entry.set_sequence_id(self.next_sequence_id);
        self.next_sequence_id += 1;
        self.entries.insert(hash, entry);
        Ok(())
    }

    pub fn get(&self, hash: &Hash) -> Option<&BlockIndexEntry> {
        self.entries.get(hash)
    }

    pub(crate) fn get_mut(&mut self, hash: &Hash) -> Option<&mut BlockIndexEntry> {
        self.entries.get_mut(hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.entries.contains_key(hash)
    }

    pub fn values(&self) -> impl Iterator<Item = &BlockIndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::U256;

    fn entry(tag: u8) -> BlockIndexEntry {
        BlockIndexEntry::new([tag; 32], tag as u64, None, U256::from(tag), 0)
    }

    #[test]
    fn test_insert_assigns_sequence_ids() {
        let mut map = BlockMap::new();
        map.insert(entry(1)).unwrap();
        map.insert(entry(2)).unwrap();

        assert_eq!(map.get(&[1; 32]).unwrap().sequence_id(), 0);
        assert_eq!(map.get(&[2; 32]).unwrap().sequence_id(), 1);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut map = BlockMap::new();
        map.insert(entry(1)).unwrap();

        let result = map.insert(entry(1));
        assert!(matches!(result, Err(InvalidationError::DuplicateBlock(h)) if h == [1; 32]));
        assert_eq!(map.len(), 1);
    }
}
