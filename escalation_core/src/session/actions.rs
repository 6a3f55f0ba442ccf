//! Action Controller - operator actions on an incident session.
//!
//! Every action records a last-action tag and returns a fresh recommendation.
//! Only these actions write `current_intervention` and `attempt_count`.

use chrono::{DateTime, Utc};
use incident_signals::{Scenario, ScenarioError, Tier};

use super::IncidentSession;
use crate::evaluator::Recommendation;
use crate::events::{ActionKind, LastAction};

impl IncidentSession {
    fn record(&mut self, kind: ActionKind, now: DateTime<Utc>) -> Recommendation {
        tracing::info!(session = %self.id, action = ?kind, "operator action");
        self.last_action = Some(LastAction { kind, at: now });
        self.reevaluate(now)
    }

    /// Commit the recommended tier.
    pub fn confirm(&mut self) -> Recommendation {
        let now = self.now();
        let committed = self.recommendation().state;
        self.store.commit_intervention(committed);
        self.record(ActionKind::Confirm { committed }, now)
    }

    /// Commit one tier above the recommended one, clamped at Service.
    pub fn escalate(&mut self) -> Recommendation {
        let now = self.now();
        let from = self.recommendation().state;
        let to = from.escalated();
        self.store.commit_intervention(to);
        self.record(ActionKind::Escalate { from, to }, now)
    }

    /// Commit an operator-chosen tier, bypassing the recommendation.
    ///
    /// Without a target this is a no-op and returns `None`.
    pub fn override_to(&mut self, target: Option<Tier>) -> Option<Recommendation> {
        let target = target?;
        let now = self.now();
        self.store.commit_intervention(target);
        Some(self.record(ActionKind::Override { target }, now))
    }

    /// Override from an operator selection such as `"Field Recovery"`.
    /// Unrecognized selections are a no-op.
    pub fn override_named(&mut self, selection: &str) -> Option<Recommendation> {
        self.override_to(Tier::parse(selection))
    }

    /// Load a preset from the session's catalog by name.
    pub fn load_scenario(&mut self, name: &str) -> Result<Recommendation, ScenarioError> {
        let scenario = self.scenarios.require(name)?.clone();
        Ok(self.apply_scenario(&scenario))
    }

    /// Replace the structured signals and start a fresh intervention history.
    pub fn apply_scenario(&mut self, scenario: &Scenario) -> Recommendation {
        let now = self.now();
        self.store.load_structured(&scenario.signals);
        self.record(
            ActionKind::ScenarioLoad {
                name: scenario.name.clone(),
            },
            now,
        )
    }

    /// Add the configured time step to the blocked timer.
    pub fn advance_time(&mut self) -> Recommendation {
        let now = self.now();
        let minutes = self.config.time_step_min;
        self.store.advance_time(i64::from(minutes));
        self.record(ActionKind::AdvanceTime { minutes }, now)
    }

    /// Clear the attempt counter, keeping the committed tier.
    pub fn reset_attempts(&mut self) -> Recommendation {
        let now = self.now();
        self.store.reset_attempts();
        self.record(ActionKind::ResetAttempts, now)
    }
}
