//! Intervention tiers, priorities and vehicle conditions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed condition of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    /// Vehicle cannot proceed because something is in its path.
    #[default]
    Blocked,
    /// Vehicle cannot resolve its own situation (e.g. planner deadlock).
    Stuck,
    /// Vehicle has a fault.
    Degraded,
}

impl Condition {
    /// Whether the incident counts as unresolved for the closed-loop rule.
    pub fn is_obstructed(&self) -> bool {
        matches!(self, Condition::Blocked | Condition::Stuck)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Blocked => "Blocked",
            Condition::Stuck => "Stuck",
            Condition::Degraded => "Degraded",
        };
        f.write_str(name)
    }
}

/// Escalation tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Monitor,
    RemoteAssist,
    FieldRecovery,
    Service,
}

impl Tier {
    /// The escalation ladder used by the Escalate action.
    pub const LADDER: [Tier; 4] = [
        Tier::Monitor,
        Tier::RemoteAssist,
        Tier::FieldRecovery,
        Tier::Service,
    ];

    /// The next tier up the ladder, clamped at `Service`.
    pub fn escalated(self) -> Tier {
        let idx = Self::LADDER
            .iter()
            .position(|t| *t == self)
            .unwrap_or(Self::LADDER.len() - 1);
        Self::LADDER[(idx + 1).min(Self::LADDER.len() - 1)]
    }

    /// Fixed position of this tier on the 0-100 severity scale.
    pub fn severity_anchor(&self) -> f64 {
        match self {
            Tier::Monitor => 10.0,
            Tier::RemoteAssist => 40.0,
            Tier::FieldRecovery => 75.0,
            Tier::Service => 95.0,
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Monitor => "Monitor",
            Tier::RemoteAssist => "Remote Assist",
            Tier::FieldRecovery => "Field Recovery",
            Tier::Service => "Service",
        }
    }

    /// Parse an operator-selected tier. Matching ignores case, spaces and underscores.
    pub fn parse(input: &str) -> Option<Tier> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "monitor" => Some(Tier::Monitor),
            "remoteassist" => Some(Tier::RemoteAssist),
            "fieldrecovery" => Some(Tier::FieldRecovery),
            "service" => Some(Tier::Service),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Urgency attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(name)
    }
}
