//! Scenario presets - named bundles of structured signals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signals::StructuredSignals;
use crate::tier::Condition;

/// Errors from looking up or loading scenario presets.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("unknown scenario `{0}`")]
    Unknown(String),
    #[error("duplicate scenario `{0}`")]
    Duplicate(String),
    #[error("invalid scenario file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A named preset. Loading one replaces the structured signals only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub signals: StructuredSignals,
}

impl Scenario {
    /// Create a new scenario.
    pub fn new(name: impl Into<String>, description: impl Into<String>, signals: StructuredSignals) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            signals,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default, rename = "scenario")]
    scenarios: Vec<Scenario>,
}

/// Ordered collection of presets, addressed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScenarioCatalog {
    /// Build a catalog, rejecting duplicate names.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, ScenarioError> {
        let mut catalog = Self {
            scenarios: Vec::with_capacity(scenarios.len()),
        };
        for scenario in scenarios {
            if catalog.get(&scenario.name).is_some() {
                return Err(ScenarioError::Duplicate(scenario.name));
            }
            catalog.scenarios.push(scenario);
        }
        Ok(catalog)
    }

    /// The presets shipped with the engine.
    pub fn builtin() -> Self {
        let preset = |name: &str,
                      description: &str,
                      condition: Condition,
                      time_blocked_min: u32,
                      rider_onboard: bool,
                      police_present: bool,
                      drivable: bool| {
            Scenario::new(
                name,
                description,
                StructuredSignals {
                    condition,
                    time_blocked_min,
                    rider_onboard,
                    police_present,
                    drivable,
                },
            )
        };

        Self {
            scenarios: vec![
                preset(
                    "blocked_transient",
                    "Delivery van double-parked, rider onboard, cleared within a minute or two",
                    Condition::Blocked,
                    1,
                    true,
                    false,
                    true,
                ),
                preset(
                    "blocked_extended",
                    "Construction closure blocking the lane for several minutes",
                    Condition::Blocked,
                    6,
                    true,
                    false,
                    true,
                ),
                preset(
                    "stuck_rider_onboard",
                    "Vehicle stuck in an unprotected turn with a rider onboard",
                    Condition::Stuck,
                    3,
                    true,
                    false,
                    true,
                ),
                preset(
                    "stuck_police_on_scene",
                    "Vehicle stuck in an intersection, police directing traffic around it",
                    Condition::Stuck,
                    8,
                    false,
                    true,
                    true,
                ),
                preset(
                    "degraded_not_drivable",
                    "Sensor fault, vehicle reports it cannot be driven",
                    Condition::Degraded,
                    2,
                    false,
                    false,
                    false,
                ),
            ],
        }
    }

    /// Parse presets from TOML.
    ///
    /// ```toml
    /// [[scenario]]
    /// name = "blocked_transient"
    /// description = "Brief blockage"
    ///
    /// [scenario.signals]
    /// condition = "Blocked"
    /// time_blocked_min = 1
    /// rider_onboard = true
    /// police_present = false
    /// drivable = true
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = toml::from_str(source)?;
        let catalog = Self::new(file.scenarios)?;
        tracing::debug!(count = catalog.len(), "loaded scenario presets");
        Ok(catalog)
    }

    /// Get a preset by name.
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// Get a preset by name, failing for unknown names.
    pub fn require(&self, name: &str) -> Result<&Scenario, ScenarioError> {
        self.get(name)
            .ok_or_else(|| ScenarioError::Unknown(name.to_string()))
    }

    /// Scenario names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(|s| s.name.as_str())
    }

    /// Iterate over all scenarios.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// Number of scenarios in the catalog.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Check if the catalog has no scenarios.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
