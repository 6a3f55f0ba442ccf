//! Rule Evaluator - maps a Signal Store snapshot to a recommendation.
//!
//! Base rules are checked in a fixed order and the first match wins:
//! 1. **Degraded, not drivable** -> Service / High
//! 2. **Stuck, police on scene** -> Field Recovery / High
//! 3. **Stuck, rider onboard** -> Remote Assist / High
//! 4. **Blocked past the threshold** -> Remote Assist / Medium
//! 5. **Otherwise** -> Monitor / Low
//!
//! The closed-loop rule then ratchets any non-Service result up to Field
//! Recovery when a committed Remote Assist attempt has not resolved the
//! incident.

mod cues;

pub use cues::*;

use incident_signals::{Condition, Priority, SignalStore, Tier};
use serde::{Deserialize, Serialize};

/// Thresholds for the rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Minutes blocked before a blockage is no longer treated as transient.
    pub blocked_threshold_min: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            blocked_threshold_min: 5,
        }
    }
}

/// Which rule produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    DegradedNotDrivable,
    StuckPolicePresent,
    StuckRiderOnboard,
    BlockedPastThreshold,
    TransientOrMinor,
    RemoteAssistUnresolved,
}

/// The rules-derived escalation tier. Recomputed on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub state: Tier,
    pub priority: Priority,
    pub rationale: String,
    pub rule: RuleId,
    pub cues: [ConfidenceCue; 3],
}

impl Recommendation {
    /// One-line summary, e.g. `Remote Assist (Medium): Blocked ≥5 min`.
    pub fn headline(&self) -> String {
        format!("{} ({}): {}", self.state, self.priority, self.rationale)
    }
}

/// Evaluate with the default thresholds.
pub fn evaluate(signals: &SignalStore) -> Recommendation {
    evaluate_with(signals, &RuleConfig::default())
}

/// Evaluate the rule set. Total over every Signal Store state.
pub fn evaluate_with(signals: &SignalStore, config: &RuleConfig) -> Recommendation {
    let (state, priority, rationale, rule) = base_rule(signals, config);

    let (state, priority, rationale, rule) =
        if state != Tier::Service && remote_assist_unresolved(signals, config) {
            (
                Tier::FieldRecovery,
                Priority::High,
                "Remote assist failed to resolve".to_string(),
                RuleId::RemoteAssistUnresolved,
            )
        } else {
            (state, priority, rationale, rule)
        };

    let recommendation = Recommendation {
        state,
        priority,
        rationale,
        rule,
        cues: confidence_cues(state, signals, config),
    };

    tracing::debug!(
        tier = %recommendation.state,
        priority = %recommendation.priority,
        rule = ?recommendation.rule,
        "evaluated signals"
    );

    recommendation
}

fn base_rule(signals: &SignalStore, config: &RuleConfig) -> (Tier, Priority, String, RuleId) {
    let threshold = config.blocked_threshold_min;

    match signals.condition {
        Condition::Degraded if !signals.drivable => (
            Tier::Service,
            Priority::High,
            "Not drivable while degraded".to_string(),
            RuleId::DegradedNotDrivable,
        ),
        Condition::Stuck if signals.police_present => (
            Tier::FieldRecovery,
            Priority::High,
            "Stuck with police on scene".to_string(),
            RuleId::StuckPolicePresent,
        ),
        Condition::Stuck if signals.rider_onboard => (
            Tier::RemoteAssist,
            Priority::High,
            "Stuck with rider onboard".to_string(),
            RuleId::StuckRiderOnboard,
        ),
        Condition::Blocked if signals.time_blocked_min >= threshold => (
            Tier::RemoteAssist,
            Priority::Medium,
            format!("Blocked ≥{} min", threshold),
            RuleId::BlockedPastThreshold,
        ),
        _ => (
            Tier::Monitor,
            Priority::Low,
            "Transient or minor".to_string(),
            RuleId::TransientOrMinor,
        ),
    }
}

/// A committed Remote Assist attempt on an incident that is still obstructed
/// past the threshold.
fn remote_assist_unresolved(signals: &SignalStore, config: &RuleConfig) -> bool {
    signals.current_intervention == Some(Tier::RemoteAssist)
        && signals.attempt_count >= 1
        && signals.condition.is_obstructed()
        && signals.time_blocked_min >= config.blocked_threshold_min
}

/// Marker position on the 0-100 severity scale, for visualization only.
///
/// An explicit `severity_score` wins over the tier anchor.
pub fn severity_marker(recommendation: &Recommendation, signals: &SignalStore) -> f64 {
    match signals.severity_score {
        Some(score) if !score.is_nan() => score.clamp(0.0, 100.0),
        _ => recommendation.state.severity_anchor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_signals::StructuredSignals;

    fn store(
        condition: Condition,
        time_blocked_min: u32,
        rider_onboard: bool,
        police_present: bool,
        drivable: bool,
    ) -> SignalStore {
        SignalStore::from_structured(&StructuredSignals {
            condition,
            time_blocked_min,
            rider_onboard,
            police_present,
            drivable,
        })
    }

    #[test]
    fn test_transient_blockage_monitors() {
        let rec = evaluate(&store(Condition::Blocked, 1, true, false, true));
        assert_eq!(rec.state, Tier::Monitor);
        assert_eq!(rec.priority, Priority::Low);
        assert_eq!(rec.rationale, "Transient or minor");
        assert_eq!(rec.rule, RuleId::TransientOrMinor);
    }

    #[test]
    fn test_extended_blockage_remote_assist() {
        let rec = evaluate(&store(Condition::Blocked, 6, true, false, true));
        assert_eq!(rec.state, Tier::RemoteAssist);
        assert_eq!(rec.priority, Priority::Medium);
        assert_eq!(rec.rationale, "Blocked ≥5 min");
    }

    #[test]
    fn test_blocked_threshold_is_inclusive() {
        let rec = evaluate(&store(Condition::Blocked, 5, false, false, true));
        assert_eq!(rec.rule, RuleId::BlockedPastThreshold);

        let rec = evaluate(&store(Condition::Blocked, 4, false, false, true));
        assert_eq!(rec.rule, RuleId::TransientOrMinor);
    }

    #[test]
    fn test_stuck_with_police_field_recovery() {
        for rider in [true, false] {
            for drivable in [true, false] {
                let rec = evaluate(&store(Condition::Stuck, 0, rider, true, drivable));
                assert_eq!(rec.state, Tier::FieldRecovery);
                assert_eq!(rec.priority, Priority::High);
                assert_eq!(rec.rationale, "Stuck with police on scene");
            }
        }
    }

    #[test]
    fn test_stuck_with_rider_remote_assist() {
        let rec = evaluate(&store(Condition::Stuck, 2, true, false, true));
        assert_eq!(rec.state, Tier::RemoteAssist);
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.rationale, "Stuck with rider onboard");
    }

    #[test]
    fn test_stuck_alone_monitors() {
        let rec = evaluate(&store(Condition::Stuck, 30, false, false, true));
        assert_eq!(rec.state, Tier::Monitor);
    }

    #[test]
    fn test_degraded_not_drivable_service() {
        let rec = evaluate(&store(Condition::Degraded, 0, true, true, false));
        assert_eq!(rec.state, Tier::Service);
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.rationale, "Not drivable while degraded");
    }

    #[test]
    fn test_degraded_but_drivable_monitors() {
        let rec = evaluate(&store(Condition::Degraded, 20, true, true, true));
        assert_eq!(rec.state, Tier::Monitor);
    }

    #[test]
    fn test_closed_loop_override() {
        let mut signals = store(Condition::Blocked, 11, true, false, true);
        signals.commit_intervention(Tier::RemoteAssist);

        let rec = evaluate(&signals);
        assert_eq!(rec.state, Tier::FieldRecovery);
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.rationale, "Remote assist failed to resolve");
        assert_eq!(rec.rule, RuleId::RemoteAssistUnresolved);
    }

    #[test]
    fn test_closed_loop_needs_attempt() {
        let mut signals = store(Condition::Blocked, 11, true, false, true);
        signals.current_intervention = Some(Tier::RemoteAssist);
        signals.attempt_count = 0;

        assert_eq!(evaluate(&signals).state, Tier::RemoteAssist);
    }

    #[test]
    fn test_closed_loop_needs_time_past_threshold() {
        let mut signals = store(Condition::Stuck, 3, true, false, true);
        signals.commit_intervention(Tier::RemoteAssist);

        assert_eq!(evaluate(&signals).state, Tier::RemoteAssist);
    }

    #[test]
    fn test_closed_loop_overrides_monitor() {
        // Stuck with neither rider nor police falls to Monitor, but the ratchet still fires.
        let mut signals = store(Condition::Stuck, 9, false, false, true);
        signals.commit_intervention(Tier::RemoteAssist);

        assert_eq!(evaluate(&signals).state, Tier::FieldRecovery);
    }

    #[test]
    fn test_closed_loop_never_replaces_service() {
        let mut signals = store(Condition::Degraded, 30, false, false, false);
        signals.commit_intervention(Tier::RemoteAssist);

        assert_eq!(evaluate(&signals).state, Tier::Service);
    }

    #[test]
    fn test_custom_threshold() {
        let config = RuleConfig {
            blocked_threshold_min: 10,
        };
        let signals = store(Condition::Blocked, 7, false, false, true);
        assert_eq!(evaluate_with(&signals, &config).state, Tier::Monitor);

        let signals = store(Condition::Blocked, 10, false, false, true);
        let rec = evaluate_with(&signals, &config);
        assert_eq!(rec.state, Tier::RemoteAssist);
        assert_eq!(rec.rationale, "Blocked ≥10 min");
    }

    #[test]
    fn test_severity_marker_uses_anchor() {
        let signals = store(Condition::Blocked, 6, false, false, true);
        let rec = evaluate(&signals);
        assert_eq!(severity_marker(&rec, &signals), 40.0);
    }

    #[test]
    fn test_severity_marker_prefers_explicit_score() {
        let mut signals = store(Condition::Blocked, 6, false, false, true);
        signals.severity_score = Some(130.0);
        let rec = evaluate(&signals);
        assert_eq!(severity_marker(&rec, &signals), 100.0);
    }

    #[test]
    fn test_headline() {
        let rec = evaluate(&store(Condition::Degraded, 0, false, false, false));
        assert_eq!(rec.headline(), "Service (High): Not drivable while degraded");
    }
}
