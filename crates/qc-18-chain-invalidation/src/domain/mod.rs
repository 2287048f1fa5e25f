//! Domain layer for the Chain Invalidation subsystem
//!
//! - status: monotonic validity flags
//! - entry: block index entries
//! - block_map: owning hash → entry storage
//! - active_chain: height-indexed view of the selected chain
//! - candidates: ordered best-tip candidate set
//! - chainstate: the lock-guarded aggregate of the above
//! - validation: per-block validation outcome

mod active_chain;
mod block_map;
mod candidates;
mod chainstate;
mod entry;
mod error;
mod status;
mod validation;

pub use active_chain::*;
pub use block_map::*;
pub use candidates::*;
pub use chainstate::*;
pub use entry::*;
pub use error::*;
pub use status::*;
pub use validation::*;
