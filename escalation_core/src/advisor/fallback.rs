//! Canned answers used when the collaborator is unavailable.

use incident_signals::SignalStore;

use crate::chat::LiveSummary;
use crate::evaluator::Recommendation;

/// Answer a question from local context alone, routed by keyword.
pub fn fallback_answer(
    question: &str,
    signals: &SignalStore,
    recommendation: &Recommendation,
    summary: &LiveSummary,
) -> String {
    let q = question.to_lowercase();

    if q.contains("why") || q.contains("reason") {
        return format!(
            "Recommending {} because: {}.",
            recommendation.state, recommendation.rationale
        );
    }

    if q.contains("police") {
        return if signals.police_present {
            "Police are on scene.".to_string()
        } else {
            "No police presence has been reported.".to_string()
        };
    }

    if q.contains("tow") {
        return match signals.tow_eta_min {
            Some(eta) => format!("Tow ETA is about {} minutes.", eta),
            None => "No tow ETA has been reported.".to_string(),
        };
    }

    if q.contains("rider") || q.contains("passenger") {
        return match (&signals.rider_state, signals.rider_onboard) {
            (Some(state), _) => format!("Rider reported {}.", state),
            (None, true) => "A rider is onboard; no further status reported.".to_string(),
            (None, false) => "No rider onboard.".to_string(),
        };
    }

    let mut answer = format!("Current recommendation: {}.", recommendation.headline());
    if !summary.is_empty() {
        answer.push_str(" Known facts: ");
        answer.push_str(&summary.facts().join("; "));
        answer.push('.');
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{aggregate, ChatMessage, Transcript};
    use crate::evaluator::evaluate;
    use chrono::Utc;

    #[test]
    fn test_why_uses_rationale() {
        let mut signals = SignalStore::new();
        signals.time_blocked_min = 8;
        let rec = evaluate(&signals);

        let answer = fallback_answer("Why remote assist?", &signals, &rec, &LiveSummary::new());
        assert_eq!(answer, "Recommending Remote Assist because: Blocked ≥5 min.");
    }

    #[test]
    fn test_police_and_tow() {
        let mut signals = SignalStore::new();
        signals.police_present = true;
        signals.tow_eta_min = Some(18);
        let rec = evaluate(&signals);
        let summary = LiveSummary::new();

        assert_eq!(
            fallback_answer("Are police there?", &signals, &rec, &summary),
            "Police are on scene."
        );
        assert_eq!(
            fallback_answer("When is the tow coming", &signals, &rec, &summary),
            "Tow ETA is about 18 minutes."
        );
    }

    #[test]
    fn test_rider_status() {
        let mut signals = SignalStore::new();
        signals.rider_onboard = true;
        let rec = evaluate(&signals);

        let answer = fallback_answer("How is the rider?", &signals, &rec, &LiveSummary::new());
        assert_eq!(answer, "A rider is onboard; no further status reported.");
    }

    #[test]
    fn test_default_includes_summary() {
        let signals = SignalStore::new();
        let rec = evaluate(&signals);
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::human("Field", "no injuries", Utc::now()));
        let summary = aggregate(&transcript);

        let answer = fallback_answer("Status?", &signals, &rec, &summary);
        assert!(answer.starts_with("Current recommendation: Monitor (Low)"));
        assert!(answer.contains("No injuries reported"));
    }
}
