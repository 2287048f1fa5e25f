//! # Core Identifiers
//!
//! - **Chain**: `Hash`, `U256` (cumulative chain work)
//! - **Networking**: `NodeId`, `PeerId`

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte block hash.
pub type Hash = [u8; 32];

/// Render a hash as lowercase hex for logs and error messages.
pub fn hash_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Render the first 8 bytes of a hash, enough to identify a block in logs.
pub fn short_hash(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}

/// Unique identifier for a node in the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", short_hash(&self.0))
    }
}

/// A peer identifier (alias for `NodeId` in peer contexts).
pub type PeerId = NodeId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_hex_length() {
        let hash = [0xAB; 32];
        assert_eq!(hash_hex(&hash).len(), 64);
        assert_eq!(short_hash(&hash), "abababababababab");
    }

    #[test]
    fn test_node_id_display_is_short_hex() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        assert_eq!(NodeId::new(bytes).to_string(), "0100000000000000");
    }
}
