//! Adapters implementing the outbound ports
//!
//! In-memory and logging implementations, used by light nodes and tests.
//! Full nodes plug in the block-file layer, the UTXO-aware tip manager and
//! the peer manager instead.

mod dirty_index;
mod fork_warning;
mod peer_scores;
mod tip_manager;

pub use dirty_index::InMemoryDirtyIndex;
pub use fork_warning::LoggingForkWarning;
pub use peer_scores::{PeerScore, PeerScoreBook};
pub use tip_manager::InMemoryChainTipManager;
