//! Actions whose effects depend on the degree of success of a check.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record;
use crate::tier::Tier;

/// Effect text for each degree of success. Missing entries mean the tier has
/// no special effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEffects {
    /// Effect on a critical success.
    #[serde(rename = "critSuccess", default, skip_serializing_if = "Option::is_none")]
    pub critical_success: Option<String>,
    /// Effect on a success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    /// Effect on a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// Effect on a critical failure.
    #[serde(rename = "critFailure", default, skip_serializing_if = "Option::is_none")]
    pub critical_failure: Option<String>,
}

impl ActionEffects {
    /// The effect text for a tier, if any.
    pub fn for_tier(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::CriticalSuccess => self.critical_success.as_deref(),
            Tier::Success => self.success.as_deref(),
            Tier::Failure => self.failure.as_deref(),
            Tier::CriticalFailure => self.critical_failure.as_deref(),
        }
    }
}

/// A rules action such as Aid, resolved with a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    /// Unique, stable key (e.g. `"aid"`).
    #[serde(rename = "ref")]
    pub reference_id: String,
    /// Human-readable label; falls back to the reference id.
    #[serde(default)]
    pub name: String,
    /// Action type, e.g. "Reaction" or "Single Action".
    #[serde(rename = "type", default)]
    pub kind: String,
    /// What lets the action be taken, for reactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// Preconditions for using the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    /// Rule text, one paragraph per entry.
    #[serde(default)]
    pub description: Vec<String>,
    /// Effects keyed by degree of success.
    #[serde(default)]
    pub effects: ActionEffects,
}

impl ActionDefinition {
    /// Read an action from a loosely-typed record. Returns `None` only for
    /// non-object values.
    pub fn from_record(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let effects = match record.get("effects") {
            Some(Value::Object(e)) => ActionEffects {
                critical_success: record::optional_string(e, "critSuccess"),
                success: record::optional_string(e, "success"),
                failure: record::optional_string(e, "failure"),
                critical_failure: record::optional_string(e, "critFailure"),
            },
            _ => ActionEffects::default(),
        };
        Some(Self {
            reference_id: record::string_field(record, "ref"),
            name: record::string_field(record, "name"),
            kind: record::string_field(record, "type"),
            trigger: record::optional_string(record, "trigger"),
            requirements: record::optional_string(record, "requirements"),
            description: record::string_list(record, "description"),
            effects,
        })
    }

    /// The display name, or the reference id when the name is empty.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.reference_id
        } else {
            &self.name
        }
    }

    /// The effect text for a tier, if any.
    pub fn effect_for(&self, tier: Tier) -> Option<&str> {
        self.effects.for_tier(tier)
    }
}
