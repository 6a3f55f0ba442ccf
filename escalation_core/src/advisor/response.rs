//! Parsing the collaborator's response.

use incident_signals::{SignalKey, SignalValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::QaError;
use crate::promotion::SignalCandidate;

/// The collaborator's answer with optional structured output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaResponse {
    pub answer: String,
    /// Proposed signal updates, keyed by wire name. Keys may be arbitrary.
    #[serde(default)]
    pub new_signals: Map<String, Value>,
    #[serde(default)]
    pub severity_delta: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
}

impl QaResponse {
    /// A plain answer with no structured output.
    pub fn answer_only(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            new_signals: Map::new(),
            severity_delta: None,
            confidence: None,
        }
    }

    /// Parse a JSON payload. A missing or blank `answer` is an error.
    pub fn from_json(payload: &str) -> Result<Self, QaError> {
        let value: Value = serde_json::from_str(payload)?;
        match value.get("answer") {
            Some(Value::String(answer)) if !answer.trim().is_empty() => {}
            _ => return Err(QaError::MissingField("answer")),
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Convert `new_signals` into candidates in key order.
    ///
    /// Unknown keys and values of the wrong shape are skipped.
    pub fn signal_candidates(&self) -> Vec<SignalCandidate> {
        let mut candidates = Vec::new();
        for (name, raw) in &self.new_signals {
            let Some(key) = SignalKey::parse(name) else {
                tracing::debug!(key = %name, "ignoring unknown signal from assistant");
                continue;
            };
            match SignalValue::from_json(key, raw) {
                Ok(value) => {
                    let label = format!("Assistant reported {} = {}", key, value);
                    candidates.push(SignalCandidate::new(key, value, label));
                }
                Err(err) => {
                    tracing::debug!(error = %err, "ignoring mistyped signal from assistant");
                }
            }
        }
        candidates
    }
}
