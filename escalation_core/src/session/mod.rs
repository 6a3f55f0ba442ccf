//! Incident session - owns the Signal Store, transcript and summary for one incident.
//!
//! All mutation is synchronous and runs to completion before the next event,
//! through one of two paths:
//! - **Chat pipeline**: append -> summarize -> extract -> gate -> notify -> re-evaluate
//! - **Operator actions**: see the `actions` submodule

mod actions;

use chrono::{DateTime, Duration, Utc};
use incident_signals::{ScenarioCatalog, SignalKey, SignalStore, StructuredSignals};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::advisor::{fallback_answer, QaError, QaExchange, QaProvider, QaRequest, QaResponse};
use crate::chat::{aggregate_with_capacity, ChatMessage, LiveSummary, MessageKind, Transcript, DEFAULT_SUMMARY_CAPACITY};
use crate::evaluator::{evaluate_with, severity_marker, Recommendation, RuleConfig};
use crate::events::{AnswerSource, LastAction, PipelineOutcome, QaOutcome};
use crate::promotion::{extract, RelevanceGate, SignalCandidate, DEFAULT_ALLOW_LIST};

/// Unique identifier for incident sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub rules: RuleConfig,

    /// Minutes added by the Advance Time action.
    pub time_step_min: u32,

    /// Maximum bullets in the live summary.
    pub summary_capacity: usize,

    /// Messages passed to the Q&A collaborator.
    pub transcript_tail: usize,

    /// Previous Q&A exchanges kept and passed to the collaborator.
    pub qa_history_limit: usize,

    /// Keys the relevance gate may promote.
    pub allow_list: Vec<SignalKey>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rules: RuleConfig::default(),
            time_step_min: 5,
            summary_capacity: DEFAULT_SUMMARY_CAPACITY,
            transcript_tail: 8,
            qa_history_limit: 6,
            allow_list: DEFAULT_ALLOW_LIST.to_vec(),
        }
    }
}

/// Source of the current time. Injectable so tests are deterministic.
pub type Clock = fn() -> DateTime<Utc>;

/// The state of one incident and the operations that change it.
pub struct IncidentSession {
    id: SessionId,
    config: SessionConfig,
    gate: RelevanceGate,
    scenarios: ScenarioCatalog,
    store: SignalStore,
    transcript: Transcript,
    summary: LiveSummary,
    qa_history: VecDeque<QaExchange>,
    last_action: Option<LastAction>,
    last_evaluated_at: Option<DateTime<Utc>>,
    clock: Clock,
}

impl Default for IncidentSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl IncidentSession {
    /// Create a session with default signals and the built-in scenarios.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            gate: RelevanceGate::new(config.allow_list.iter().copied()),
            config,
            scenarios: ScenarioCatalog::builtin(),
            store: SignalStore::new(),
            transcript: Transcript::new(),
            summary: LiveSummary::new(),
            qa_history: VecDeque::new(),
            last_action: None,
            last_evaluated_at: None,
            clock: Utc::now,
        }
    }

    /// Seed the structured signals.
    pub fn with_signals(mut self, structured: StructuredSignals) -> Self {
        self.store = SignalStore::from_structured(&structured);
        self
    }

    /// Replace the scenario catalog.
    pub fn with_scenarios(mut self, scenarios: ScenarioCatalog) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only view of the Signal Store.
    pub fn signals(&self) -> &SignalStore {
        &self.store
    }

    /// Full transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Current live summary.
    pub fn summary(&self) -> &LiveSummary {
        &self.summary
    }

    /// Scenarios available to load.
    pub fn scenarios(&self) -> &ScenarioCatalog {
        &self.scenarios
    }

    /// Most recent operator action.
    pub fn last_action(&self) -> Option<&LastAction> {
        self.last_action.as_ref()
    }

    /// Past Q&A exchanges, oldest first.
    pub fn qa_history(&self) -> impl Iterator<Item = &QaExchange> {
        self.qa_history.iter()
    }

    /// Evaluate the current signals. Always fresh, never cached.
    pub fn recommendation(&self) -> Recommendation {
        evaluate_with(&self.store, &self.config.rules)
    }

    /// Marker position for the current recommendation on the 0-100 scale.
    pub fn severity_marker(&self) -> f64 {
        severity_marker(&self.recommendation(), &self.store)
    }

    /// Time since the last re-evaluation, for display. `None` before the first one.
    pub fn since_last_evaluation(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_evaluated_at.map(|at| now - at)
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Re-evaluate after a mutation and stamp the evaluation time.
    fn reevaluate(&mut self, now: DateTime<Utc>) -> Recommendation {
        self.last_evaluated_at = Some(now);
        self.recommendation()
    }

    /// Push an inbound chat message through the pipeline.
    ///
    /// When nothing is promoted the recommendation is left untouched and the
    /// outcome carries none.
    pub fn ingest_message(
        &mut self,
        source: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> PipelineOutcome {
        let now = self.now();
        let message = ChatMessage::new(source, text, kind, now);
        let latest_text = message.text.clone();
        let message_id = self.transcript.push(message);

        self.summary = aggregate_with_capacity(&self.transcript, self.config.summary_capacity);

        let candidates = extract(&latest_text, &self.summary);
        let applied = self.gate.promote(&mut self.store, &candidates);
        let (notifications, recommendation) = self.commit_promotions(&applied, now);

        PipelineOutcome {
            message_id,
            applied,
            notifications,
            recommendation,
        }
    }

    /// Emit one system notification per applied candidate and re-evaluate
    /// if anything was applied.
    ///
    /// Notifications name the raw key and value only. They join the
    /// transcript, so they must not contain any summary fact phrase.
    fn commit_promotions(
        &mut self,
        applied: &[SignalCandidate],
        now: DateTime<Utc>,
    ) -> (Vec<ChatMessage>, Option<Recommendation>) {
        if applied.is_empty() {
            return (Vec::new(), None);
        }

        let notifications: Vec<ChatMessage> = applied
            .iter()
            .map(|c| {
                ChatMessage::system(
                    format!("Agent promoted {} = {}", c.key, c.value),
                    now,
                )
            })
            .collect();
        for notification in &notifications {
            self.transcript.push(notification.clone());
        }

        (notifications, Some(self.reevaluate(now)))
    }

    /// Assemble the request for the external collaborator.
    pub fn prepare_question(&self, question: impl Into<String>) -> QaRequest {
        QaRequest {
            question: question.into(),
            signals: self.store.clone(),
            live_summary: self.summary.facts().to_vec(),
            transcript_tail: self.transcript.tail(self.config.transcript_tail).to_vec(),
            recommendation: self.recommendation(),
            history: self.qa_history.iter().cloned().collect(),
        }
    }

    /// Apply the collaborator's result, falling back to a canned answer on failure.
    ///
    /// The result is applied against the current state, even if that state
    /// changed after the request was prepared.
    pub fn resolve_answer(
        &mut self,
        question: &str,
        result: Result<QaResponse, QaError>,
    ) -> QaOutcome {
        let now = self.now();

        let outcome = match result {
            Ok(response) => self.apply_response(response, now),
            Err(err) => {
                tracing::warn!(error = %err, "assistant unavailable, using local answer");
                QaOutcome {
                    answer: fallback_answer(question, &self.store, &self.recommendation(), &self.summary),
                    source: AnswerSource::Fallback,
                    confidence: None,
                    applied: Vec::new(),
                    notifications: Vec::new(),
                    severity_score: None,
                    recommendation: None,
                }
            }
        };

        self.qa_history.push_back(QaExchange {
            question: question.to_string(),
            answer: outcome.answer.clone(),
            source: outcome.source,
        });
        while self.qa_history.len() > self.config.qa_history_limit {
            self.qa_history.pop_front();
        }

        outcome
    }

    fn apply_response(&mut self, response: QaResponse, now: DateTime<Utc>) -> QaOutcome {
        let candidates = response.signal_candidates();
        let applied = self.gate.promote(&mut self.store, &candidates);
        let (notifications, mut recommendation) = self.commit_promotions(&applied, now);

        let mut severity_score = None;
        if let Some(delta) = response.severity_delta.filter(|d| d.is_finite()) {
            let anchor = self
                .store
                .severity_score
                .unwrap_or_else(|| self.recommendation().state.severity_anchor());
            self.store.set_severity_score(Some(anchor + delta));
            severity_score = self.store.severity_score;
            tracing::info!(delta, score = ?severity_score, "adjusted severity from assistant");
            if recommendation.is_none() {
                recommendation = Some(self.reevaluate(now));
            }
        }

        QaOutcome {
            answer: response.answer,
            source: AnswerSource::Provider,
            confidence: response.confidence,
            applied,
            notifications,
            severity_score,
            recommendation,
        }
    }

    /// Ask a synchronous collaborator and resolve its answer.
    pub fn ask(&mut self, provider: &dyn QaProvider, question: &str) -> QaOutcome {
        let request = self.prepare_question(question);
        let result = provider.answer(&request);
        self.resolve_answer(question, result)
    }
}
