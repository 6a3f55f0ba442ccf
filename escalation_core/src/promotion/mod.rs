//! Signal promotion - turning chat facts into Signal Store updates.
//!
//! Promotion happens in two steps:
//! 1. **Extraction**: the latest message and the live summary yield candidates
//! 2. **Gating**: the relevance gate applies allow-listed candidates that change the store

mod extractor;
mod gate;

pub use extractor::*;
pub use gate::*;

use incident_signals::{SignalKey, SignalValue};
use serde::{Deserialize, Serialize};

/// A proposed single-signal update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub key: SignalKey,
    pub value: SignalValue,
    /// Human readable description of the fact behind the candidate.
    pub label: String,
}

impl SignalCandidate {
    /// Create a new candidate.
    pub fn new(key: SignalKey, value: SignalValue, label: impl Into<String>) -> Self {
        Self {
            key,
            value,
            label: label.into(),
        }
    }
}
