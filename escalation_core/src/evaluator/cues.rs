//! Confidence cues - three short question/answer pairs backing each tier.

use incident_signals::{Condition, SignalStore, Tier};
use serde::{Deserialize, Serialize};

use super::RuleConfig;

/// A label with a short answer drawn from a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCue {
    pub label: String,
    pub short_answer: String,
}

impl ConfidenceCue {
    fn new(label: &str, short_answer: &str) -> Self {
        Self {
            label: label.to_string(),
            short_answer: short_answer.to_string(),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Compute the cues for `state`. Deterministic in `(state, signals)`.
pub fn confidence_cues(state: Tier, signals: &SignalStore, config: &RuleConfig) -> [ConfidenceCue; 3] {
    let threshold = config.blocked_threshold_min;
    let below_threshold = signals.time_blocked_min < threshold;

    match state {
        Tier::Monitor => [
            ConfidenceCue::new(
                "Situation transient?",
                if signals.condition == Condition::Blocked && below_threshold {
                    "Yes"
                } else {
                    "Likely temporary?"
                },
            ),
            ConfidenceCue::new("Vehicle healthy?", yes_no(signals.drivable)),
            ConfidenceCue::new(
                &format!("Under {} min impact?", threshold),
                yes_no(below_threshold),
            ),
        ],
        Tier::RemoteAssist => [
            ConfidenceCue::new(
                "Remote fix feasible?",
                if signals.drivable || signals.condition == Condition::Blocked {
                    "Yes"
                } else {
                    "Unclear"
                },
            ),
            ConfidenceCue::new(
                "Avoids field dispatch?",
                if signals.police_present { "Unlikely" } else { "Yes" },
            ),
            ConfidenceCue::new(
                "Safe to attempt?",
                if signals.police_present { "Coordinated" } else { "Yes" },
            ),
        ],
        Tier::FieldRecovery => [
            ConfidenceCue::new(
                "Public impact?",
                if signals.condition != Condition::Degraded && !below_threshold {
                    "Yes"
                } else if signals.police_present {
                    "Managed"
                } else {
                    "Limited"
                },
            ),
            ConfidenceCue::new("Authorities involved?", yes_no(signals.police_present)),
            ConfidenceCue::new(
                "Remote attempt failed?",
                if signals.current_intervention == Some(Tier::RemoteAssist)
                    && signals.attempt_count >= 1
                {
                    "Yes"
                } else {
                    "Unknown"
                },
            ),
        ],
        Tier::Service => [
            ConfidenceCue::new(
                "Repair needed?",
                if signals.drivable { "Unclear" } else { "Yes" },
            ),
            ConfidenceCue::new(
                "Redeploy risk?",
                if signals.drivable { "Unknown" } else { "Yes" },
            ),
            ConfidenceCue::new(
                "Pull from fleet?",
                if signals.drivable { "Unclear" } else { "Yes" },
            ),
        ],
    }
}
