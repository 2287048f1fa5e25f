//! Active chain: the currently selected best chain
//!
//! A height-indexed sequence of block hashes from genesis to tip. The
//! hashes are non-owning handles into the [`super::BlockMap`].

use super::{BlockIndexEntry, ChainResult, InvalidationError};
use shared_types::Hash;

/// Height-indexed view of the selected chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveChain {
    /// `hashes[h]` is the block at height `h`.
    hashes: Vec<Hash>,
}

impl ActiveChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the chain by one block.
    ///
    /// Only block acceptance connects blocks; invalidation never appends.
    /// The entry must sit at the next height and build on the current tip.
    pub fn push(&mut self, entry: &BlockIndexEntry) -> ChainResult<()> {
        let expected = self.hashes.len() as u64;
        if entry.height() != expected || entry.parent() != self.tip() {
            return Err(InvalidationError::ChainLinkage {
                hash: *entry.hash(),
                expected,
                actual: entry.height(),
            });
        }
        self.hashes.push(*entry.hash());
        Ok(())
    }

    /// Remove and return the tip. Used by chain tip managers.
    pub fn pop_tip(&mut self) -> Option<Hash> {
        self.hashes.pop()
    }

    pub fn tip(&self) -> Option<&Hash> {
        self.hashes.last()
    }

    /// Height of the tip, `None` for an empty chain.
    pub fn height(&self) -> Option<u64> {
        self.hashes.len().checked_sub(1).map(|h| h as u64)
    }

    /// Block hash at `height`.
    pub fn get(&self, height: u64) -> Option<&Hash> {
        usize::try_from(height).ok().and_then(|h| self.hashes.get(h))
    }

    /// Is `entry` part of the active chain?
    pub fn contains(&self, entry: &BlockIndexEntry) -> bool {
        self.get(entry.height()) == Some(entry.hash())
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hash> {
        self.hashes.iter()
    }
}
