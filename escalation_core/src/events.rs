//! Action tags and outcomes reported back to the rendering layer.

use chrono::{DateTime, Utc};
use incident_signals::Tier;
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, MessageId};
use crate::evaluator::Recommendation;
use crate::promotion::SignalCandidate;

/// Operator actions handled by the action controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Confirm { committed: Tier },
    Escalate { from: Tier, to: Tier },
    Override { target: Tier },
    ScenarioLoad { name: String },
    AdvanceTime { minutes: u32 },
    ResetAttempts,
}

/// The most recent operator action. Not read by the rule evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    pub kind: ActionKind,
    pub at: DateTime<Utc>,
}

/// Result of pushing one inbound message through the chat pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub message_id: MessageId,
    /// Candidates the relevance gate committed, in application order.
    pub applied: Vec<SignalCandidate>,
    /// One system notification per applied candidate.
    pub notifications: Vec<ChatMessage>,
    /// Fresh recommendation, present only when something was applied.
    pub recommendation: Option<Recommendation>,
}

impl PipelineOutcome {
    /// Check if any signal was applied.
    pub fn changed_signals(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Where a Q&A answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerSource {
    Provider,
    Fallback,
}

/// Result of resolving a question against the external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaOutcome {
    pub answer: String,
    pub source: AnswerSource,
    pub confidence: Option<String>,
    pub applied: Vec<SignalCandidate>,
    pub notifications: Vec<ChatMessage>,
    /// Severity score after applying the response's delta, if one was given.
    pub severity_score: Option<f64>,
    /// Fresh recommendation, present when signals or severity changed.
    pub recommendation: Option<Recommendation>,
}
