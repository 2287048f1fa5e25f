//! Chainstate: block map, active chain and candidate set under one lock
//!
//! There is one `Chainstate` per node, created empty at startup and shared
//! as an `Arc<ConsensusLock>`. Every mutation happens through `&mut
//! Chainstate`, which can only be obtained by holding the lock (or by
//! owning the state outright, as tests do).

use super::{ActiveChain, BlockIndexCandidates, BlockIndexEntry, BlockMap, ChainResult, InvalidationError};
use parking_lot::Mutex;
use shared_types::{Hash, U256};
use std::sync::Arc;

/// The global consensus lock. Not reentrant.
pub type ConsensusLock = Mutex<Chainstate>;

/// Process-wide consensus state.
#[derive(Debug, Default)]
pub struct Chainstate {
    pub(crate) block_map: BlockMap,
    pub(crate) active_chain: ActiveChain,
    pub(crate) candidates: BlockIndexCandidates,
    /// Highest-work block ever found invalid. Only moves to higher work.
    pub(crate) most_work_invalid: Option<Hash>,
    initial_sync: bool,
}

impl Chainstate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap this state in the shared consensus lock.
    pub fn into_shared(self) -> Arc<ConsensusLock> {
        Arc::new(Mutex::new(self))
    }

    pub fn block_map(&self) -> &BlockMap {
        &self.block_map
    }

    pub(crate) fn block_map_mut(&mut self) -> &mut BlockMap {
        &mut self.block_map
    }

    pub fn active_chain(&self) -> &ActiveChain {
        &self.active_chain
    }

    pub fn candidates(&self) -> &BlockIndexCandidates {
        &self.candidates
    }

    pub fn block(&self, hash: &Hash) -> Option<&BlockIndexEntry> {
        self.block_map.get(hash)
    }

    /// Entry of the active chain tip.
    pub fn tip_entry(&self) -> Option<&BlockIndexEntry> {
        self.active_chain
            .tip()
            .and_then(|hash| self.block_map.get(hash))
    }

    pub fn most_work_invalid(&self) -> Option<&BlockIndexEntry> {
        self.most_work_invalid
            .as_ref()
            .and_then(|hash| self.block_map.get(hash))
    }

    pub fn is_initial_sync(&self) -> bool {
        self.initial_sync
    }

    pub fn set_initial_sync(&mut self, initial_sync: bool) {
        self.initial_sync = initial_sync;
    }

    // === BLOCK ACCEPTANCE ===
    //
    // Used by header/block acceptance to populate state. Invalidation never
    // calls these.

    /// Add a newly accepted block to the block map.
    pub fn add_block(&mut self, entry: BlockIndexEntry) -> ChainResult<()> {
        self.block_map.insert(entry)
    }

    /// Connect a known block as the new active tip.
    pub fn connect_tip(&mut self, hash: &Hash) -> ChainResult<()> {
        let entry = self
            .block_map
            .get(hash)
            .ok_or(InvalidationError::UnknownBlock(*hash))?;
        self.active_chain.push(entry)
    }

    /// Offer a block to the candidate set.
    ///
    /// Returns `true` if it was inserted.
    pub fn try_add_candidate(&mut self, hash: &Hash) -> ChainResult<bool> {
        let tip_work = self.tip_work();
        let entry = self
            .block_map
            .get(hash)
            .ok_or(InvalidationError::UnknownBlock(*hash))?;
        if !qualifies(entry, tip_work) {
            return Ok(false);
        }
        Ok(self.candidates.insert(entry))
    }

    // === INVALIDATION SUPPORT ===

    /// Chain work of the active tip, `None` for an empty chain.
    pub fn tip_work(&self) -> Option<U256> {
        self.tip_entry().map(|entry| entry.chain_work())
    }

    /// Rebuild the candidate set from a full scan of the block map.
    ///
    /// Returns the new candidate count.
    pub fn rebuild_candidates(&mut self) -> usize {
        let tip_work = self.tip_work();
        self.candidates.clear();
        for entry in self.block_map.values() {
            if qualifies(entry, tip_work) {
                self.candidates.insert(entry);
            }
        }
        self.candidates.len()
    }

    /// Remember `hash` as the most-work invalid block if it has more work
    /// than the current record.
    ///
    /// Returns `true` if the record changed.
    pub fn note_invalid_block(&mut self, hash: &Hash) -> bool {
        let Some(candidate) = self.block_map.get(hash) else {
            return false;
        };
        let replace = match self.most_work_invalid() {
            Some(current) => candidate.chain_work() > current.chain_work(),
            None => true,
        };
        if replace {
            self.most_work_invalid = Some(*hash);
        }
        replace
    }
}

/// Candidate-set membership test. With an empty active chain there is no
/// work floor.
fn qualifies(entry: &BlockIndexEntry, tip_work: Option<U256>) -> bool {
    entry.status().is_candidate_eligible()
        && tip_work.map_or(true, |work| entry.chain_work() >= work)
}
