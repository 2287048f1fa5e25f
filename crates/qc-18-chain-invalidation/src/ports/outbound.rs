//! Driven ports (Outbound dependencies)
//!
//! All of these are called synchronously while the consensus lock is held.
//! Only [`ChainTipManager`] reports an outcome the engine acts on; the
//! other three are fire-and-forget.

use crate::config::ForkWarningConfig;
use crate::domain::{ActiveChain, BlockIndexEntry, BlockMap};
use crate::events::ForkWarningContext;
use shared_types::PeerId;

/// Rolls the active chain back by one block.
pub trait ChainTipManager: Send + Sync {
    /// Disconnect the current tip, undoing its effects on dependent state
    /// (e.g. unspent outputs).
    ///
    /// On `Err` the active chain must be left unchanged.
    fn disconnect_tip(&self, chain: &mut ActiveChain, blocks: &BlockMap) -> Result<(), String>;
}

/// Queues block index entries for persistence by the block-file layer.
pub trait DirtyIndexRecorder: Send + Sync {
    fn record_dirty(&self, entry: &BlockIndexEntry);
}

/// Peer misbehavior scoring.
pub trait PeerMisbehaviorSink: Send + Sync {
    /// Add `score` to the peer's misbehavior. Best-effort.
    fn penalize(&self, peer: &PeerId, score: u32, reason: &str);
}

/// Decides whether to raise a user-facing chain split alert.
pub trait ForkWarningEvaluator: Send + Sync {
    fn check_fork_warning(
        &self,
        config: &ForkWarningConfig,
        context: &ForkWarningContext,
        is_initial_sync: bool,
    );
}
