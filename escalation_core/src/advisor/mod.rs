//! Advisor - contract with the optional external Q&A collaborator.
//!
//! The collaborator answers free-text questions about the incident. It is
//! non-authoritative: its answer is shown to the operator, and its structured
//! output reaches the Signal Store only through the relevance gate.
//!
//! 1. **Request**: assemble the question with a snapshot of the incident
//! 2. **Response**: parse the answer, proposed signals and severity delta
//! 3. **Fallback**: any failure is replaced by a canned, context-derived answer

mod fallback;
mod response;

pub use fallback::*;
pub use response::*;

use incident_signals::SignalStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::ChatMessage;
use crate::evaluator::Recommendation;
use crate::events::AnswerSource;

/// Failures of the external collaborator. Never surfaced to the operator.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("provider unreachable: {0}")]
    Transport(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("provider payload missing `{0}`")]
    MissingField(&'static str),
}

/// A previous question and the answer given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaExchange {
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
}

/// Everything the collaborator is given to answer a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRequest {
    pub question: String,
    pub signals: SignalStore,
    pub live_summary: Vec<String>,
    pub transcript_tail: Vec<ChatMessage>,
    pub recommendation: Recommendation,
    pub history: Vec<QaExchange>,
}

impl QaRequest {
    /// Format the request as a prompt string.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();
        let s = &self.signals;

        prompt.push_str("## Current Recommendation\n");
        prompt.push_str(&self.recommendation.headline());
        prompt.push('\n');
        for cue in &self.recommendation.cues {
            prompt.push_str(&format!("- {} {}\n", cue.label, cue.short_answer));
        }
        prompt.push('\n');

        prompt.push_str("## Signals\n");
        prompt.push_str(&format!(
            "Condition: {}, blocked {} min, rider onboard: {}, police present: {}, drivable: {}\n",
            s.condition, s.time_blocked_min, s.rider_onboard, s.police_present, s.drivable
        ));
        prompt.push_str(&format!(
            "Current intervention: {}, attempts: {}\n",
            s.current_intervention
                .map(|t| t.to_string())
                .unwrap_or_else(|| "None".to_string()),
            s.attempt_count
        ));
        if let Some(eta) = s.tow_eta_min {
            prompt.push_str(&format!("Tow ETA: {} min\n", eta));
        }
        if let Some(rider) = &s.rider_state {
            prompt.push_str(&format!("Rider state: {}\n", rider));
        }
        if s.remote_assist_failed {
            prompt.push_str("Remote assist reported failed\n");
        }
        if s.lane_partially_blocked {
            prompt.push_str("Lane partially blocked\n");
        }
        prompt.push('\n');

        if !self.live_summary.is_empty() {
            prompt.push_str("## Live Summary\n");
            for fact in &self.live_summary {
                prompt.push_str(&format!("- {}\n", fact));
            }
            prompt.push('\n');
        }

        if !self.transcript_tail.is_empty() {
            prompt.push_str("## Recent Chat\n");
            for message in &self.transcript_tail {
                prompt.push_str(&format!("[{}] {}\n", message.source, message.text));
            }
            prompt.push('\n');
        }

        if !self.history.is_empty() {
            prompt.push_str("## Previous Questions\n");
            for exchange in &self.history {
                prompt.push_str(&format!("Q: {}\nA: {}\n", exchange.question, exchange.answer));
            }
            prompt.push('\n');
        }

        prompt.push_str("## Question\n");
        prompt.push_str(&self.question);
        prompt.push('\n');

        prompt
    }
}

/// An external collaborator able to answer questions.
///
/// Implementations typically forward the request to a language-model
/// provider; transport and status failures map onto [`QaError`].
pub trait QaProvider {
    fn answer(&self, request: &QaRequest) -> Result<QaResponse, QaError>;
}
