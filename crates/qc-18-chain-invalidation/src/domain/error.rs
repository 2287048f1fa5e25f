//! Error types for the Chain Invalidation subsystem

use shared_types::{hash_hex, Hash};

/// Chain invalidation errors
#[derive(Debug, thiserror::Error)]
pub enum InvalidationError {
    #[error("Unknown block: {}", hash_hex(.0))]
    UnknownBlock(Hash),

    #[error("Block already in block map: {}", hash_hex(.0))]
    DuplicateBlock(Hash),

    #[error("Block {} does not extend the active chain: expected height {expected}, got {actual}", hash_hex(.hash))]
    ChainLinkage {
        hash: Hash,
        expected: u64,
        actual: u64,
    },

    /// The chain tip manager failed to roll back the tip. The active chain
    /// may be in an unexpected position; the candidate set was not rebuilt.
    #[error("Failed to disconnect tip {} at height {height}: {reason}", hash_hex(.hash))]
    DisconnectFailed {
        hash: Hash,
        height: u64,
        reason: String,
    },

    #[error("Chain tip manager reported success but tip {} is still connected", hash_hex(.0))]
    TipNotDisconnected(Hash),
}

/// Result type for chain invalidation operations
pub type ChainResult<T> = Result<T, InvalidationError>;
