//! Signal keys and values - the typed vocabulary for single-signal updates.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::SignalError;

/// Keys for signals that may be written one at a time, either by the chat
/// pipeline or by the external Q&A collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKey {
    PolicePresent,
    RemoteAssistFailed,
    TowEtaMin,
    LanePartiallyBlocked,
    RiderState,
    /// Extracted for display only; the Signal Store has no field for it.
    Injuries,
}

/// The shape of value a key accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Minutes,
    Text,
}

impl ValueKind {
    /// Name used in type mismatch errors.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Minutes => "non-negative integer",
            ValueKind::Text => "string",
        }
    }
}

impl SignalKey {
    pub const ALL: [SignalKey; 6] = [
        SignalKey::PolicePresent,
        SignalKey::RemoteAssistFailed,
        SignalKey::TowEtaMin,
        SignalKey::LanePartiallyBlocked,
        SignalKey::RiderState,
        SignalKey::Injuries,
    ];

    /// Wire name of the key (camelCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKey::PolicePresent => "policePresent",
            SignalKey::RemoteAssistFailed => "remoteAssistFailed",
            SignalKey::TowEtaMin => "towEtaMin",
            SignalKey::LanePartiallyBlocked => "lanePartiallyBlocked",
            SignalKey::RiderState => "riderState",
            SignalKey::Injuries => "injuries",
        }
    }

    /// Look a key up by its wire name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<SignalKey> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// The value type this key accepts.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            SignalKey::PolicePresent
            | SignalKey::RemoteAssistFailed
            | SignalKey::LanePartiallyBlocked => ValueKind::Bool,
            SignalKey::TowEtaMin => ValueKind::Minutes,
            SignalKey::RiderState | SignalKey::Injuries => ValueKind::Text,
        }
    }

    /// Whether the Signal Store has a field backing this key.
    pub fn is_stored(&self) -> bool {
        !matches!(self, SignalKey::Injuries)
    }
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value carried by a single-signal update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Bool(bool),
    Minutes(u32),
    Text(String),
}

impl SignalValue {
    /// The type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            SignalValue::Bool(_) => ValueKind::Bool,
            SignalValue::Minutes(_) => ValueKind::Minutes,
            SignalValue::Text(_) => ValueKind::Text,
        }
    }

    /// Convert loosely-typed JSON into the value shape `key` expects.
    ///
    /// Booleans also accept `"true"`/`"false"` strings and minutes accept
    /// numeric strings, since language-model output is not reliably typed.
    pub fn from_json(key: SignalKey, value: &Value) -> Result<SignalValue, SignalError> {
        let mismatch = || SignalError::TypeMismatch {
            key,
            expected: key.value_kind().name(),
        };
        match key.value_kind() {
            ValueKind::Bool => match value {
                Value::Bool(b) => Ok(SignalValue::Bool(*b)),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" => Ok(SignalValue::Bool(true)),
                    "false" | "no" => Ok(SignalValue::Bool(false)),
                    _ => Err(mismatch()),
                },
                _ => Err(mismatch()),
            },
            ValueKind::Minutes => {
                let minutes = match value {
                    Value::Number(n) => n.as_u64().or_else(|| {
                        n.as_f64()
                            .filter(|f| f.is_finite() && *f >= 0.0)
                            .map(|f| f.round() as u64)
                    }),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                };
                minutes
                    .and_then(|m| u32::try_from(m).ok())
                    .map(SignalValue::Minutes)
                    .ok_or_else(mismatch)
            }
            ValueKind::Text => match value {
                Value::String(s) => Ok(SignalValue::Text(s.clone())),
                _ => Err(mismatch()),
            },
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Bool(b) => write!(f, "{}", b),
            SignalValue::Minutes(m) => write!(f, "{}", m),
            SignalValue::Text(s) => f.write_str(s),
        }
    }
}
