//! Condition definitions as they appear in the rule catalog.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record;

/// A condition granted automatically when another condition first becomes active.
///
/// Grants refer to their target by reference id and are resolved against the
/// catalog at apply time, so cascade cycles never become ownership cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeGrant {
    /// Reference id of the granted condition.
    #[serde(rename = "ref")]
    pub reference_id: String,
    /// Default level for the granted condition. `None` leaves it unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl CascadeGrant {
    /// Grant a condition without a default level.
    pub fn new(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            level: None,
        }
    }

    /// Grant a condition at a specific level.
    pub fn at_level(reference_id: impl Into<String>, level: u32) -> Self {
        Self {
            reference_id: reference_id.into(),
            level: Some(level).filter(|l| *l > 0),
        }
    }
}

/// A named status effect from the rule catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDefinition {
    /// Unique, stable key (e.g. `"frightened"`).
    #[serde(rename = "ref")]
    pub reference_id: String,
    /// Human-readable label.
    #[serde(rename = "name", default)]
    pub display_name: String,
    /// Rule text, one paragraph per entry.
    #[serde(default)]
    pub description: Vec<String>,
    /// Whether the condition carries a numeric level.
    #[serde(default)]
    pub incremental: bool,
    /// Whether the condition applies to objects rather than creatures.
    #[serde(rename = "objectOnly", default)]
    pub object_only: bool,
    /// Reference ids this condition supersedes.
    #[serde(default)]
    pub overrides: BTreeSet<String>,
    /// Conditions granted the first time this one becomes active, in order.
    #[serde(rename = "conditionsGained", default)]
    pub cascades: Vec<CascadeGrant>,
}

impl ConditionDefinition {
    /// Create a binary condition with no cascades or overrides.
    pub fn new(reference_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            reference_id: reference_id.into(),
            display_name: display_name.into(),
            description: Vec::new(),
            incremental: false,
            object_only: false,
            overrides: BTreeSet::new(),
            cascades: Vec::new(),
        }
    }

    /// Mark the condition as carrying a level.
    pub fn incremental(mut self) -> Self {
        self.incremental = true;
        self
    }

    /// Add a cascade grant.
    pub fn grants(mut self, grant: CascadeGrant) -> Self {
        self.cascades.push(grant);
        self
    }

    /// Add an overridden reference id.
    pub fn overrides(mut self, reference_id: impl Into<String>) -> Self {
        self.overrides.insert(reference_id.into());
        self
    }

    /// Read a definition from a loosely-typed record.
    ///
    /// Returns `None` only when the record is not a JSON object. Fields with
    /// the wrong type take their defaults, and malformed cascade entries are
    /// dropped.
    pub fn from_record(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let cascades = match record.get("conditionsGained") {
            Some(Value::Array(items)) => items.iter().filter_map(cascade_from_record).collect(),
            _ => Vec::new(),
        };
        Some(Self {
            reference_id: record::string_field(record, "ref"),
            display_name: record::string_field(record, "name"),
            description: record::string_list(record, "description"),
            incremental: record::bool_field(record, "incremental"),
            object_only: record::bool_field(record, "objectOnly"),
            overrides: record::string_list(record, "overrides").into_iter().collect(),
            cascades,
        })
    }

    /// Returns true if this condition lists `reference_id` as overridden.
    pub fn supersedes(&self, reference_id: &str) -> bool {
        self.overrides.contains(reference_id)
    }

    /// The display name, or the reference id when the name is empty.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.reference_id
        } else {
            &self.display_name
        }
    }
}

impl fmt::Display for ConditionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.reference_id)
    }
}

fn cascade_from_record(value: &Value) -> Option<CascadeGrant> {
    let record = value.as_object()?;
    let reference_id = record.get("ref")?.as_str()?.to_string();
    Some(CascadeGrant {
        reference_id,
        level: record::positive_level(record.get("level")),
    })
}
