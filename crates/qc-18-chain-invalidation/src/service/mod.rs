//! Invalidation Service - Core business logic
//!
//! # Operations
//! - `invalidate_block_locked`: flag a block, roll the active chain off it,
//!   rebuild the candidate set
//! - `invalid_block_found_locked`: peer-sourced rejection of a single block
//! - `invalid_chain_found`: record, log and run fork-warning evaluation

use crate::config::InvalidationConfig;
use crate::domain::{ChainResult, Chainstate, ConsensusLock, InvalidationError, ValidationState};
use crate::events::{ChainTipSummary, ForkWarningContext, InvalidChainFoundEvent};
use crate::metrics;
use crate::ports::{
    BlockInvalidationApi, ChainTipManager, DirtyIndexRecorder, ForkWarningEvaluator,
    InvalidBlockOutcome, InvalidationReport, PeerIdByBlock, PeerMisbehaviorSink,
};
use shared_types::{hash_hex, Hash};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Reason attached to every invalid-block misbehavior penalty.
pub const INVALID_BLOCK_REASON: &str = "Invalid block sourced from peer";

/// Invalidation Service
pub struct InvalidationService<T, D, P, F>
where
    T: ChainTipManager,
    D: DirtyIndexRecorder,
    P: PeerMisbehaviorSink,
    F: ForkWarningEvaluator,
{
    tip_manager: Arc<T>,
    dirty_recorder: Arc<D>,
    peer_sink: Arc<P>,
    fork_warning: Arc<F>,
    chainstate: Arc<ConsensusLock>,
    config: InvalidationConfig,
}

/// Dependencies for InvalidationService
pub struct InvalidationDependencies<T, D, P, F> {
    pub tip_manager: Arc<T>,
    pub dirty_recorder: Arc<D>,
    pub peer_sink: Arc<P>,
    pub fork_warning: Arc<F>,
    pub config: InvalidationConfig,
}

impl<T, D, P, F> InvalidationService<T, D, P, F>
where
    T: ChainTipManager,
    D: DirtyIndexRecorder,
    P: PeerMisbehaviorSink,
    F: ForkWarningEvaluator,
{
    /// Create a new InvalidationService over the shared chainstate
    pub fn new(deps: InvalidationDependencies<T, D, P, F>, chainstate: Arc<ConsensusLock>) -> Self {
        Self {
            tip_manager: deps.tip_manager,
            dirty_recorder: deps.dirty_recorder,
            peer_sink: deps.peer_sink,
            fork_warning: deps.fork_warning,
            chainstate,
            config: deps.config,
        }
    }

    /// The consensus lock this service operates under
    pub fn chainstate(&self) -> Arc<ConsensusLock> {
        Arc::clone(&self.chainstate)
    }

    pub fn config(&self) -> &InvalidationConfig {
        &self.config
    }

    /// Invalidate `hash` and everything built on it.
    ///
    /// 1. Flag the target `FAILED_VALID` and drop it from the candidates.
    /// 2. While the target is on the active chain, flag the tip
    ///    `FAILED_CHILD` and disconnect it.
    /// 3. Rebuild the candidate set from the whole block map.
    /// 4. Signal `invalid_chain_found`.
    ///
    /// If a disconnect fails the flags already set stay set, but the
    /// candidate set is left as it was and no event is signalled.
    pub fn invalidate_block_locked(
        &self,
        state: &mut Chainstate,
        hash: &Hash,
    ) -> ChainResult<InvalidationReport> {
        let target = state
            .block_map
            .get_mut(hash)
            .ok_or(InvalidationError::UnknownBlock(*hash))?;
        if target.mark_failed_valid() {
            metrics::record_block_invalidated();
        }
        target.mark_dirty();
        self.dirty_recorder.record_dirty(target);
        state.candidates.erase(hash);

        let mut report = InvalidationReport {
            target: *hash,
            ..InvalidationReport::default()
        };

        while Self::target_on_active_chain(state, hash) {
            let Some(tip_hash) = state.active_chain.tip().copied() else {
                break;
            };
            let tip = state
                .block_map
                .get_mut(&tip_hash)
                .ok_or(InvalidationError::UnknownBlock(tip_hash))?;
            if tip_hash != *hash && tip.mark_failed_child() {
                report.failed_descendants.push(tip_hash);
            }
            tip.mark_dirty();
            self.dirty_recorder.record_dirty(tip);
            let tip_height = tip.height();
            state.candidates.erase(&tip_hash);

            if let Err(reason) = self
                .tip_manager
                .disconnect_tip(&mut state.active_chain, &state.block_map)
            {
                error!(
                    "Failed to disconnect tip {} at height {} while invalidating {}: {}",
                    hash_hex(&tip_hash),
                    tip_height,
                    hash_hex(hash),
                    reason
                );
                metrics::record_rollback_failure();
                return Err(InvalidationError::DisconnectFailed {
                    hash: tip_hash,
                    height: tip_height,
                    reason,
                });
            }
            if state.active_chain.tip() == Some(&tip_hash) {
                return Err(InvalidationError::TipNotDisconnected(tip_hash));
            }

            metrics::record_block_disconnected();
            report.disconnected.push(tip_hash);
        }

        // The rolled-back tip may have been erased from the set above, and
        // blocks that were below the old tip's work may now qualify.
        report.candidate_count = state.rebuild_candidates();
        report.best_candidate = state.candidates.best();
        metrics::record_candidate_set_size(report.candidate_count);
        debug!(
            "Rebuilt {} chain tip candidates after invalidating {}",
            report.candidate_count,
            hash_hex(hash)
        );

        self.invalid_chain_found(state, hash);
        Ok(report)
    }

    /// Handle a block that failed validation.
    ///
    /// The relaying peer is penalized whenever the result is invalid with a
    /// non-zero DoS score. The block itself is only condemned when the
    /// failure cannot be blamed on local corruption.
    pub fn invalid_block_found_locked(
        &self,
        state: &mut Chainstate,
        peer_by_block: &PeerIdByBlock,
        hash: &Hash,
        validation: &ValidationState,
    ) -> ChainResult<InvalidBlockOutcome> {
        if !state.block_map.contains(hash) {
            return Err(InvalidationError::UnknownBlock(*hash));
        }

        let mut outcome = InvalidBlockOutcome::default();

        if let Some(dos) = validation.invalid_dos().filter(|dos| *dos > 0) {
            match peer_by_block.get(hash) {
                Some(peer) => {
                    self.peer_sink.penalize(peer, dos, INVALID_BLOCK_REASON);
                    metrics::record_peer_penalized();
                    outcome.penalized_peer = Some(peer.clone());
                }
                None => debug!(
                    "Invalid block {} has no tracked source peer, no penalty applied",
                    hash_hex(hash)
                ),
            }
        }

        if validation.corruption_possible() {
            warn!(
                "Block {} failed validation ({}) but corruption is possible, not marking it invalid",
                hash_hex(hash),
                validation.reject_reason()
            );
            return Ok(outcome);
        }

        let entry = state
            .block_map
            .get_mut(hash)
            .ok_or(InvalidationError::UnknownBlock(*hash))?;
        if entry.mark_failed_valid() {
            metrics::record_block_invalidated();
        }
        entry.mark_dirty();
        self.dirty_recorder.record_dirty(entry);
        state.candidates.erase(hash);
        outcome.marked_failed = true;

        self.invalid_chain_found(state, hash);
        Ok(outcome)
    }

    /// Record `hash` as invalid, log it against the active tip and run
    /// fork-warning evaluation. Never fails.
    pub fn invalid_chain_found(&self, state: &mut Chainstate, hash: &Hash) {
        state.note_invalid_block(hash);

        let Some(invalid) = state.block(hash).map(ChainTipSummary::from) else {
            return;
        };
        let event = InvalidChainFoundEvent {
            invalid,
            best: state.tip_entry().map(ChainTipSummary::from),
        };

        warn!("InvalidChainFound: invalid block={}", event.invalid);
        match &event.best {
            Some(best) => info!("InvalidChainFound:  current best={}", best),
            None => info!("InvalidChainFound:  active chain is empty"),
        }

        let context = ForkWarningContext {
            best_invalid: state.most_work_invalid().map(ChainTipSummary::from),
            active_tip: event.best,
        };
        self.fork_warning
            .check_fork_warning(&self.config.fork_warning, &context, state.is_initial_sync());
    }

    fn target_on_active_chain(state: &Chainstate, hash: &Hash) -> bool {
        state
            .block_map
            .get(hash)
            .is_some_and(|entry| state.active_chain.contains(entry))
    }
}

impl<T, D, P, F> BlockInvalidationApi for InvalidationService<T, D, P, F>
where
    T: ChainTipManager,
    D: DirtyIndexRecorder,
    P: PeerMisbehaviorSink,
    F: ForkWarningEvaluator,
{
    fn invalidate_block(&self, hash: &Hash) -> ChainResult<InvalidationReport> {
        let mut state = self.chainstate.lock();
        self.invalidate_block_locked(&mut state, hash)
    }

    fn invalid_block_found(
        &self,
        peer_by_block: &PeerIdByBlock,
        hash: &Hash,
        validation: &ValidationState,
    ) -> ChainResult<InvalidBlockOutcome> {
        let mut state = self.chainstate.lock();
        self.invalid_block_found_locked(&mut state, peer_by_block, hash, validation)
    }

    fn best_candidate(&self) -> Option<Hash> {
        self.chainstate.lock().candidates.best()
    }

    fn most_work_invalid(&self) -> Option<Hash> {
        self.chainstate.lock().most_work_invalid
    }
}
