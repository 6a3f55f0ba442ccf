//! Relevance Gate - the allow-list boundary between extracted facts and the Signal Store.

use incident_signals::{SignalKey, SignalStore};
use serde::{Deserialize, Serialize};

use super::SignalCandidate;

/// Keys the gate promotes by default.
pub const DEFAULT_ALLOW_LIST: [SignalKey; 4] = [
    SignalKey::PolicePresent,
    SignalKey::RemoteAssistFailed,
    SignalKey::TowEtaMin,
    SignalKey::LanePartiallyBlocked,
];

/// Filters candidates to the allow-list and applies the ones that change the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceGate {
    allow_list: Vec<SignalKey>,
}

impl Default for RelevanceGate {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_LIST)
    }
}

impl RelevanceGate {
    /// Create a gate for the given keys, ignoring repeats.
    pub fn new(allow_list: impl IntoIterator<Item = SignalKey>) -> Self {
        let mut keys = Vec::new();
        for key in allow_list {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self { allow_list: keys }
    }

    /// Check if a key may be promoted.
    pub fn allows(&self, key: SignalKey) -> bool {
        self.allow_list.contains(&key)
    }

    /// Keys this gate promotes.
    pub fn allow_list(&self) -> &[SignalKey] {
        &self.allow_list
    }

    /// Apply allow-listed candidates and return those that changed the store.
    ///
    /// Candidates outside the allow-list are dropped silently. Within one
    /// batch a later candidate for the same key replaces the earlier one,
    /// keeping the position of the first, so the returned list (and the
    /// notifications built from it) follows first-discovery order per key.
    /// Writes equal to the stored value are filtered out.
    pub fn promote(&self, store: &mut SignalStore, candidates: &[SignalCandidate]) -> Vec<SignalCandidate> {
        let mut pending: Vec<SignalCandidate> = Vec::new();
        for candidate in candidates {
            if !self.allows(candidate.key) {
                tracing::debug!(key = %candidate.key, "candidate outside allow-list, display only");
                continue;
            }
            match pending.iter_mut().find(|p| p.key == candidate.key) {
                Some(existing) => *existing = candidate.clone(),
                None => pending.push(candidate.clone()),
            }
        }

        let mut applied = Vec::new();
        for candidate in pending {
            match store.apply_signal(candidate.key, candidate.value.clone()) {
                Ok(true) => {
                    tracing::info!(key = %candidate.key, value = %candidate.value, "promoted signal");
                    applied.push(candidate);
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::debug!(error = %err, "candidate rejected by signal store");
                }
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incident_signals::SignalValue;

    fn candidate(key: SignalKey, value: SignalValue) -> SignalCandidate {
        SignalCandidate::new(key, value, key.as_str())
    }

    #[test]
    fn test_applies_change() {
        let gate = RelevanceGate::default();
        let mut store = SignalStore::new();

        let applied = gate.promote(
            &mut store,
            &[candidate(SignalKey::PolicePresent, SignalValue::Bool(true))],
        );

        assert_eq!(applied.len(), 1);
        assert!(store.police_present);
    }

    #[test]
    fn test_filters_no_op() {
        let gate = RelevanceGate::default();
        let mut store = SignalStore::new();
        store.police_present = true;

        let applied = gate.promote(
            &mut store,
            &[candidate(SignalKey::PolicePresent, SignalValue::Bool(true))],
        );

        assert!(applied.is_empty());
    }

    #[test]
    fn test_drops_keys_outside_allow_list() {
        let gate = RelevanceGate::default();
        let mut store = SignalStore::new();

        let applied = gate.promote(
            &mut store,
            &[
                candidate(SignalKey::RiderState, SignalValue::Text("anxious".into())),
                candidate(SignalKey::Injuries, SignalValue::Text("none".into())),
            ],
        );

        assert!(applied.is_empty());
        assert!(store.rider_state.is_none());
    }

    #[test]
    fn test_later_duplicate_overwrites() {
        let gate = RelevanceGate::default();
        let mut store = SignalStore::new();

        let applied = gate.promote(
            &mut store,
            &[
                candidate(SignalKey::TowEtaMin, SignalValue::Minutes(20)),
                candidate(SignalKey::LanePartiallyBlocked, SignalValue::Bool(true)),
                candidate(SignalKey::TowEtaMin, SignalValue::Minutes(35)),
            ],
        );

        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].key, SignalKey::TowEtaMin);
        assert_eq!(applied[0].value, SignalValue::Minutes(35));
        assert_eq!(applied[1].key, SignalKey::LanePartiallyBlocked);
        assert_eq!(store.tow_eta_min, Some(35));
    }

    #[test]
    fn test_rejects_mistyped_value() {
        let gate = RelevanceGate::default();
        let mut store = SignalStore::new();

        let applied = gate.promote(
            &mut store,
            &[candidate(SignalKey::TowEtaMin, SignalValue::Bool(true))],
        );

        assert!(applied.is_empty());
        assert!(store.tow_eta_min.is_none());
    }

    #[test]
    fn test_custom_allow_list() {
        let gate = RelevanceGate::new([SignalKey::RiderState, SignalKey::RiderState]);
        assert_eq!(gate.allow_list(), &[SignalKey::RiderState]);

        let mut store = SignalStore::new();
        let applied = gate.promote(
            &mut store,
            &[
                candidate(SignalKey::RiderState, SignalValue::Text("calm".into())),
                candidate(SignalKey::PolicePresent, SignalValue::Bool(true)),
            ],
        );

        assert_eq!(applied.len(), 1);
        assert_eq!(store.rider_state.as_deref(), Some("calm"));
        assert!(!store.police_present);
    }
}
