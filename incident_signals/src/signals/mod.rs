//! Signal Store - the mutable record of current operational facts.

mod key;

pub use key::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tier::{Condition, Tier};

/// Errors raised when writing a single signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("signal `{key}` expects a {expected} value")]
    TypeMismatch {
        key: SignalKey,
        expected: &'static str,
    },
    #[error("signal `{0}` has no field in the signal store")]
    NotStored(SignalKey),
}

/// The structured portion of the store that a scenario preset replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSignals {
    pub condition: Condition,
    pub time_blocked_min: u32,
    pub rider_onboard: bool,
    pub police_present: bool,
    pub drivable: bool,
}

impl Default for StructuredSignals {
    fn default() -> Self {
        Self {
            condition: Condition::Blocked,
            time_blocked_min: 0,
            rider_onboard: false,
            police_present: false,
            drivable: true,
        }
    }
}

/// The complete set of signals for one incident.
///
/// `current_intervention` is the last tier an operator committed, which is
/// distinct from whatever tier is currently recommended. It and
/// `attempt_count` are written only through [`SignalStore::commit_intervention`],
/// [`SignalStore::reset_attempts`] and [`SignalStore::load_structured`]; the
/// chat pipeline writes through [`SignalStore::apply_signal`], which cannot
/// reach them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStore {
    pub condition: Condition,
    pub time_blocked_min: u32,
    pub rider_onboard: bool,
    pub police_present: bool,
    pub drivable: bool,

    /// Last confirmed or applied tier. `None` until an operator commits one.
    pub current_intervention: Option<Tier>,

    /// Committed Remote Assist attempts.
    pub attempt_count: u32,

    // Promoted signals
    pub tow_eta_min: Option<u32>,
    pub rider_state: Option<String>,
    pub remote_assist_failed: bool,
    pub lane_partially_blocked: bool,

    /// Explicit severity on the 0-100 scale, overriding the tier anchor.
    pub severity_score: Option<f64>,
}

impl Default for SignalStore {
    fn default() -> Self {
        Self::from_structured(&StructuredSignals::default())
    }
}

impl SignalStore {
    /// Create a store with default signals and no intervention history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from a structured bundle.
    pub fn from_structured(structured: &StructuredSignals) -> Self {
        Self {
            condition: structured.condition,
            time_blocked_min: structured.time_blocked_min,
            rider_onboard: structured.rider_onboard,
            police_present: structured.police_present,
            drivable: structured.drivable,
            current_intervention: None,
            attempt_count: 0,
            tow_eta_min: None,
            rider_state: None,
            remote_assist_failed: false,
            lane_partially_blocked: false,
            severity_score: None,
        }
    }

    /// Snapshot of the structured fields.
    pub fn structured(&self) -> StructuredSignals {
        StructuredSignals {
            condition: self.condition,
            time_blocked_min: self.time_blocked_min,
            rider_onboard: self.rider_onboard,
            police_present: self.police_present,
            drivable: self.drivable,
        }
    }

    /// Replace the structured fields and start a fresh intervention history.
    ///
    /// Promoted signals and the severity score are left as they are.
    pub fn load_structured(&mut self, structured: &StructuredSignals) {
        self.condition = structured.condition;
        self.time_blocked_min = structured.time_blocked_min;
        self.rider_onboard = structured.rider_onboard;
        self.police_present = structured.police_present;
        self.drivable = structured.drivable;
        self.current_intervention = None;
        self.attempt_count = 0;
    }

    /// Read a single signal. Keys without a backing field return `None`, as
    /// do optional signals that are unset.
    pub fn get(&self, key: SignalKey) -> Option<SignalValue> {
        match key {
            SignalKey::PolicePresent => Some(SignalValue::Bool(self.police_present)),
            SignalKey::RemoteAssistFailed => Some(SignalValue::Bool(self.remote_assist_failed)),
            SignalKey::LanePartiallyBlocked => {
                Some(SignalValue::Bool(self.lane_partially_blocked))
            }
            SignalKey::TowEtaMin => self.tow_eta_min.map(SignalValue::Minutes),
            SignalKey::RiderState => self.rider_state.clone().map(SignalValue::Text),
            SignalKey::Injuries => None,
        }
    }

    /// Write a single signal.
    ///
    /// Returns `Ok(true)` if the stored value changed and `Ok(false)` for a
    /// no-op write.
    pub fn apply_signal(&mut self, key: SignalKey, value: SignalValue) -> Result<bool, SignalError> {
        if !key.is_stored() {
            return Err(SignalError::NotStored(key));
        }
        if value.kind() != key.value_kind() {
            return Err(SignalError::TypeMismatch {
                key,
                expected: key.value_kind().name(),
            });
        }
        if self.get(key).as_ref() == Some(&value) {
            return Ok(false);
        }

        match (key, value) {
            (SignalKey::PolicePresent, SignalValue::Bool(b)) => self.police_present = b,
            (SignalKey::RemoteAssistFailed, SignalValue::Bool(b)) => self.remote_assist_failed = b,
            (SignalKey::LanePartiallyBlocked, SignalValue::Bool(b)) => {
                self.lane_partially_blocked = b
            }
            (SignalKey::TowEtaMin, SignalValue::Minutes(m)) => self.tow_eta_min = Some(m),
            (SignalKey::RiderState, SignalValue::Text(s)) => self.rider_state = Some(s),
            (key, _) => return Err(SignalError::NotStored(key)),
        }
        Ok(true)
    }

    /// Advance the blocked timer by `minutes` (negative values rewind), flooring at zero.
    pub fn advance_time(&mut self, minutes: i64) {
        let advanced = (self.time_blocked_min as i64).saturating_add(minutes);
        self.time_blocked_min = advanced.clamp(0, u32::MAX as i64) as u32;
    }

    /// Record an operator-committed tier. Remote Assist commits count as attempts.
    pub fn commit_intervention(&mut self, tier: Tier) {
        self.current_intervention = Some(tier);
        if tier == Tier::RemoteAssist {
            self.attempt_count = self.attempt_count.saturating_add(1);
        }
    }

    /// Clear the attempt counter without touching the committed tier.
    pub fn reset_attempts(&mut self) {
        self.attempt_count = 0;
    }

    /// Set or clear the explicit severity score, clamped to [0, 100].
    pub fn set_severity_score(&mut self, score: Option<f64>) {
        self.severity_score = score
            .filter(|s| !s.is_nan())
            .map(|s| s.clamp(0.0, 100.0));
    }
}
