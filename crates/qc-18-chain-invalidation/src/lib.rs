//! # qc-18-chain-invalidation
//!
//! Block invalidation and best-chain candidate maintenance for Quantum-Chain.
//!
//! ## Overview
//!
//! When a block that was already accepted into the block tree turns out to
//! violate consensus rules, this subsystem:
//!
//! - flags the block `FAILED_VALID` and every active-chain descendant
//!   `FAILED_CHILD` (the flags are never cleared),
//! - rolls the active chain back off the invalid block through the
//!   [`ChainTipManager`] port,
//! - rebuilds the [`BlockIndexCandidates`] set from the whole block map,
//! - records the most-work invalid block and runs fork-warning evaluation,
//! - penalizes the peer that relayed a rejected block.
//!
//! ## Architecture
//!
//! ```text
//! Validation failure ──invalidate_block──→ InvalidationService
//!                                              │
//!         ┌────────────────────┬───────────────┼────────────────────┐
//!         ↓                    ↓               ↓                    ↓
//!  [Block Map flags]   [ChainTipManager]  [Candidates rebuild]  [ForkWarningEvaluator]
//!         │              disconnect_tip                               ↑
//!         ↓                                                           │
//!  [DirtyIndexRecorder]            invalid_chain_found ───────────────┘
//! ```
//!
//! ## Locking
//!
//! The block map, active chain and candidate set live together in a
//! [`Chainstate`] behind one non-recursive [`ConsensusLock`]. Every
//! `*_locked` operation takes `&mut Chainstate`, so it cannot be called
//! without holding the lock (or owning the state outright).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_18_chain_invalidation::{
//!     BlockInvalidationApi, InvalidationConfig, InvalidationDependencies, InvalidationService,
//! };
//!
//! let service = InvalidationService::new(
//!     InvalidationDependencies {
//!         tip_manager,
//!         dirty_recorder,
//!         peer_sink,
//!         fork_warning,
//!         config: InvalidationConfig::from_env(),
//!     },
//!     chainstate,
//! );
//!
//! let report = service.invalidate_block(&bad_hash)?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::{InMemoryChainTipManager, InMemoryDirtyIndex, LoggingForkWarning, PeerScoreBook};
pub use config::{ForkWarningConfig, InvalidationConfig, PeerScoringConfig};
pub use domain::{
    ActiveChain, BlockIndexCandidates, BlockIndexEntry, BlockMap, BlockStatus, CandidateKey,
    ChainResult, Chainstate, ConsensusLock, InvalidationError, ValidationState,
};
pub use events::{ChainTipSummary, ForkWarningContext, InvalidChainFoundEvent};
pub use ports::{
    BlockInvalidationApi, ChainTipManager, DirtyIndexRecorder, ForkWarningEvaluator,
    InvalidBlockOutcome, InvalidationReport, PeerIdByBlock, PeerMisbehaviorSink,
};
pub use service::{InvalidationDependencies, InvalidationService, INVALID_BLOCK_REASON};
