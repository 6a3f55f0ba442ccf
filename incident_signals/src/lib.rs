//! # Incident Signals
//!
//! The Signal Store crate - the authoritative record of what is currently known
//! about a stuck, blocked or degraded remote vehicle. This crate is the single
//! source of truth for incident state and does not contain any decision logic.

pub mod scenario;
pub mod signals;
pub mod tier;

pub use scenario::*;
pub use signals::*;
pub use tier::*;
