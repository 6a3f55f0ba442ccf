//! Live Summary - deduplicated fact bullets recomputed from the whole transcript.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::Transcript;

/// Default number of bullets kept in the live summary.
pub const DEFAULT_SUMMARY_CAPACITY: usize = 5;

/// A recognized chat pattern and the canonical fact it stands for.
///
/// `fact` may reference capture groups (`${1}`).
pub struct FactPattern {
    pub pattern: Regex,
    pub fact: &'static str,
}

fn fact_pattern(pattern: &str, fact: &'static str) -> FactPattern {
    FactPattern {
        pattern: Regex::new(pattern).expect("valid fact pattern"),
        fact,
    }
}

/// Patterns are matched against lower-cased text, in table order.
pub static SUMMARY_FACTS: LazyLock<Vec<FactPattern>> = LazyLock::new(|| {
    vec![
        fact_pattern(r"police arrived", "Police on scene"),
        fact_pattern(r"request immediate removal", "Police request immediate removal"),
        fact_pattern(r"tow eta (\d+)", "Tow ETA ~${1} minutes"),
        fact_pattern(r"rider anxious", "Rider reported anxious but safe"),
        fact_pattern(r"remote assist attempt failed", "Remote assist attempt failed"),
        fact_pattern(r"lane partially blocked", "Lane partially blocked"),
        fact_pattern(r"no injuries", "No injuries reported"),
    ]
});

/// Ordered, deduplicated, capped set of fact strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiveSummary {
    facts: Vec<String>,
}

impl LiveSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fact unless present or full. Returns whether it was added.
    fn insert(&mut self, fact: String, capacity: usize) -> bool {
        if self.facts.len() >= capacity || self.contains(&fact) {
            return false;
        }
        self.facts.push(fact);
        true
    }

    /// Check if a fact is present.
    pub fn contains(&self, fact: &str) -> bool {
        self.facts.iter().any(|f| f == fact)
    }

    /// First fact starting with `prefix`.
    pub fn find_prefix(&self, prefix: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.starts_with(prefix))
            .map(String::as_str)
    }

    /// Facts in insertion order.
    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// Iterate over facts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(String::as_str)
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Check if the summary has no facts.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Recompute the summary from the full transcript with the default capacity.
pub fn aggregate(transcript: &Transcript) -> LiveSummary {
    aggregate_with_capacity(transcript, DEFAULT_SUMMARY_CAPACITY)
}

/// Recompute the summary from the full transcript.
///
/// Holds no state between calls, so the same transcript always yields the
/// same summary.
pub fn aggregate_with_capacity(transcript: &Transcript, capacity: usize) -> LiveSummary {
    let corpus = transcript
        .iter()
        .map(|m| m.text.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    let mut summary = LiveSummary::new();
    for entry in SUMMARY_FACTS.iter() {
        if summary.len() >= capacity {
            break;
        }
        if let Some(captures) = entry.pattern.captures(&corpus) {
            let mut fact = String::new();
            captures.expand(entry.fact, &mut fact);
            summary.insert(fact, capacity);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;
    use chrono::Utc;

    fn transcript(lines: &[&str]) -> Transcript {
        let now = Utc::now();
        let mut transcript = Transcript::new();
        for line in lines {
            transcript.push(ChatMessage::human("Ops", *line, now));
        }
        transcript
    }

    #[test]
    fn test_police_arrived() {
        let summary = aggregate(&transcript(&["Police arrived on scene"]));
        assert_eq!(summary.facts(), &["Police on scene".to_string()]);
    }

    #[test]
    fn test_case_insensitive_and_deduplicated() {
        let summary = aggregate(&transcript(&[
            "POLICE ARRIVED",
            "police arrived again",
            "No injuries, everyone fine",
        ]));
        assert_eq!(summary.len(), 2);
        assert!(summary.contains("Police on scene"));
        assert!(summary.contains("No injuries reported"));
    }

    #[test]
    fn test_tow_eta_first_match_only() {
        let summary = aggregate(&transcript(&["Tow ETA 25 min", "update: tow eta 10"]));
        assert_eq!(summary.facts(), &["Tow ETA ~25 minutes".to_string()]);
        assert_eq!(summary.find_prefix("Tow ETA"), Some("Tow ETA ~25 minutes"));
    }

    #[test]
    fn test_order_follows_fact_table() {
        let summary = aggregate(&transcript(&[
            "lane partially blocked by cones",
            "police arrived",
        ]));
        assert_eq!(
            summary.facts(),
            &["Police on scene".to_string(), "Lane partially blocked".to_string()]
        );
    }

    #[test]
    fn test_capped_at_capacity() {
        let summary = aggregate(&transcript(&[
            "police arrived",
            "they request immediate removal",
            "tow eta 15",
            "rider anxious",
            "remote assist attempt failed",
            "lane partially blocked",
            "no injuries",
        ]));
        assert_eq!(summary.len(), DEFAULT_SUMMARY_CAPACITY);
        assert!(!summary.contains("Lane partially blocked"));
    }

    #[test]
    fn test_patterns_do_not_span_messages() {
        let summary = aggregate(&transcript(&["send police", "arrived at depot"]));
        assert!(summary.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let t = transcript(&["police arrived", "tow eta 30"]);
        assert_eq!(aggregate(&t), aggregate(&t));
    }

    #[test]
    fn test_empty_transcript() {
        assert!(aggregate(&Transcript::new()).is_empty());
    }
}
