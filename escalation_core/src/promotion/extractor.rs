//! Signal Extractor - pattern matching over the latest chat message.

use incident_signals::{SignalKey, SignalValue};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::SignalCandidate;
use crate::chat::LiveSummary;

/// How a matched pattern produces a value.
#[derive(Debug, Clone, Copy)]
pub enum ValueTemplate {
    Bool(bool),
    /// Minutes read from capture group 1.
    CapturedMinutes,
    Text(&'static str),
}

impl ValueTemplate {
    fn render(&self, captures: &Captures<'_>) -> Option<SignalValue> {
        match self {
            ValueTemplate::Bool(b) => Some(SignalValue::Bool(*b)),
            ValueTemplate::CapturedMinutes => captures
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .map(SignalValue::Minutes),
            ValueTemplate::Text(s) => Some(SignalValue::Text(s.to_string())),
        }
    }
}

/// A message pattern mapped to a signal update.
///
/// `label` may reference capture groups (`${1}`).
pub struct SignalPattern {
    pub pattern: Regex,
    pub key: SignalKey,
    pub value: ValueTemplate,
    pub label: &'static str,
}

fn signal_pattern(
    pattern: &str,
    key: SignalKey,
    value: ValueTemplate,
    label: &'static str,
) -> SignalPattern {
    SignalPattern {
        pattern: Regex::new(pattern).expect("valid signal pattern"),
        key,
        value,
        label,
    }
}

/// Patterns checked against the lower-cased latest message, in table order.
pub static MESSAGE_SIGNALS: LazyLock<Vec<SignalPattern>> = LazyLock::new(|| {
    vec![
        signal_pattern(
            r"police (?:arrived|(?:is |are )?on (?:scene|site))",
            SignalKey::PolicePresent,
            ValueTemplate::Bool(true),
            "Police on scene",
        ),
        signal_pattern(
            r"remote assist (?:attempt )?failed",
            SignalKey::RemoteAssistFailed,
            ValueTemplate::Bool(true),
            "Remote assist attempt failed",
        ),
        signal_pattern(
            r"tow eta (\d+)",
            SignalKey::TowEtaMin,
            ValueTemplate::CapturedMinutes,
            "Tow ETA ~${1} minutes",
        ),
        signal_pattern(
            r"lane partially blocked",
            SignalKey::LanePartiallyBlocked,
            ValueTemplate::Bool(true),
            "Lane partially blocked",
        ),
        signal_pattern(
            r"rider anxious",
            SignalKey::RiderState,
            ValueTemplate::Text("anxious"),
            "Rider reported anxious but safe",
        ),
        signal_pattern(
            r"no injuries",
            SignalKey::Injuries,
            ValueTemplate::Text("none"),
            "No injuries reported",
        ),
    ]
});

/// Canonical summary facts that imply a signal, regardless of the wording
/// of the message that produced them.
const SUMMARY_SIGNALS: &[(&str, SignalKey, bool)] = &[
    ("Police on scene", SignalKey::PolicePresent, true),
    ("Remote assist attempt failed", SignalKey::RemoteAssistFailed, true),
    ("Lane partially blocked", SignalKey::LanePartiallyBlocked, true),
];

/// Extract candidate updates from the latest message and the current summary.
///
/// Message candidates come first, summary candidates after. Text that
/// matches nothing yields an empty list.
pub fn extract(latest_message: &str, summary: &LiveSummary) -> Vec<SignalCandidate> {
    let mut candidates = Vec::new();
    let text = latest_message.to_lowercase();

    for entry in MESSAGE_SIGNALS.iter() {
        let Some(captures) = entry.pattern.captures(&text) else {
            continue;
        };
        let Some(value) = entry.value.render(&captures) else {
            continue;
        };
        let mut label = String::new();
        captures.expand(entry.label, &mut label);
        candidates.push(SignalCandidate::new(entry.key, value, label));
    }

    for (fact, key, value) in SUMMARY_SIGNALS {
        if summary.contains(fact) {
            candidates.push(SignalCandidate::new(*key, SignalValue::Bool(*value), *fact));
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{aggregate, ChatMessage, Transcript};
    use chrono::Utc;

    fn keys(candidates: &[SignalCandidate]) -> Vec<SignalKey> {
        candidates.iter().map(|c| c.key).collect()
    }

    #[test]
    fn test_police_arrived() {
        let candidates = extract("Police arrived on scene", &LiveSummary::new());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key, SignalKey::PolicePresent);
        assert_eq!(candidates[0].value, SignalValue::Bool(true));
        assert_eq!(candidates[0].label, "Police on scene");
    }

    #[test]
    fn test_police_alternate_wording() {
        let candidates = extract("FYI police are on site now", &LiveSummary::new());
        assert_eq!(keys(&candidates), vec![SignalKey::PolicePresent]);
    }

    #[test]
    fn test_tow_eta_captured() {
        let candidates = extract("Tow ETA 25 minutes", &LiveSummary::new());
        assert_eq!(candidates[0].key, SignalKey::TowEtaMin);
        assert_eq!(candidates[0].value, SignalValue::Minutes(25));
        assert_eq!(candidates[0].label, "Tow ETA ~25 minutes");
    }

    #[test]
    fn test_display_only_signals() {
        let candidates = extract("Rider anxious, no injuries", &LiveSummary::new());
        assert_eq!(keys(&candidates), vec![SignalKey::RiderState, SignalKey::Injuries]);
    }

    #[test]
    fn test_summary_path() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::human("Field", "police arrived", Utc::now()));
        let summary = aggregate(&transcript);

        // The latest message says nothing about police, the summary still does.
        let candidates = extract("waiting on tow", &summary);
        assert_eq!(keys(&candidates), vec![SignalKey::PolicePresent]);
        assert_eq!(candidates[0].value, SignalValue::Bool(true));
    }

    #[test]
    fn test_message_candidates_precede_summary() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::human("Field", "lane partially blocked", Utc::now()));
        let summary = aggregate(&transcript);

        let candidates = extract("tow eta 40", &summary);
        assert_eq!(
            keys(&candidates),
            vec![SignalKey::TowEtaMin, SignalKey::LanePartiallyBlocked]
        );
    }

    #[test]
    fn test_no_match() {
        assert!(extract("", &LiveSummary::new()).is_empty());
        assert!(extract("all quiet", &LiveSummary::new()).is_empty());
    }
}
