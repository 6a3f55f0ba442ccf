//! # Escalation Core
//!
//! The decision engine for stuck or degraded remote vehicles. This crate reads
//! the Signal Store from `incident_signals`, folds in facts extracted from the
//! incident chat, and recommends an escalation tier.
//!
//! ## Core Components
//!
//! - **evaluator**: Rules-first classifier mapping signals to a recommendation
//! - **chat**: Append-only transcript and the deduplicated live summary
//! - **promotion**: Signal extraction from chat and the relevance gate
//! - **session**: The incident session, chat pipeline and operator actions
//! - **advisor**: Contract with the optional external Q&A collaborator
//! - **events**: Action tags and pipeline outcomes
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The recommendation is a pure function of the Signal Store
//! - **Explicit re-evaluation**: Every mutation is followed by a fresh evaluation, never a cached one
//! - **Narrow promotion**: Chat and Q&A output reach the Signal Store only through an allow-list

pub mod advisor;
pub mod chat;
pub mod evaluator;
pub mod events;
pub mod promotion;
pub mod session;

pub use advisor::*;
pub use chat::*;
pub use evaluator::*;
pub use events::*;
pub use promotion::*;
pub use session::*;
