//! # Shared Types Crate
//!
//! Primitive identifiers used by every chain-state subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Hash`, `PeerId` and `U256` are defined once
//!   here so block index entries, peer bookkeeping and logs agree on them.
//! - **Copyable keys**: block hashes are plain arrays so they can be used as
//!   map keys and non-owning handles without lifetimes.

pub mod entities;

pub use entities::*;
