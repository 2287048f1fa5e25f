//! Ports for the Chain Invalidation subsystem
//!
//! - inbound: the API other subsystems drive
//! - outbound: the collaborators this subsystem drives

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
