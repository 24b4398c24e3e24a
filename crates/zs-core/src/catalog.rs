//! The rule catalog: every condition and action known to the tracker.
//!
//! A [`RuleCatalog`] is built once at start-up and never mutated afterwards.
//! It is passed by reference into every engine call, so independent
//! catalogs can coexist in one process.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::action::ActionDefinition;
use crate::condition::ConditionDefinition;
use crate::error::{CoreError, CoreResult};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Which list a catalog record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordList {
    /// The `conditions` list.
    Conditions,
    /// The `actions` list.
    Actions,
}

impl std::fmt::Display for RecordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conditions => write!(f, "conditions"),
            Self::Actions => write!(f, "actions"),
        }
    }
}

/// A record skipped by the lenient loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    /// The list the record was in.
    pub list: RecordList,
    /// Zero-based position in that list.
    pub index: usize,
    /// Why it was dropped.
    pub reason: String,
}

/// Summary of a lenient catalog load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of conditions accepted.
    pub conditions_loaded: usize,
    /// Number of actions accepted.
    pub actions_loaded: usize,
    /// Records that were skipped.
    pub dropped: Vec<DroppedRecord>,
}

impl LoadReport {
    /// Returns true if no record was dropped.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// How a catalog entry points at a reference id that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A `conditionsGained` entry.
    Cascade,
    /// An `overrides` entry.
    Override,
}

/// A cascade or override target missing from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// The condition that holds the reference.
    pub from: String,
    /// The missing target.
    pub target: String,
    /// Cascade or override.
    pub kind: ReferenceKind,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ReferenceKind::Cascade => "grants",
            ReferenceKind::Override => "overrides",
        };
        write!(f, "{} {kind} unknown condition \"{}\"", self.from, self.target)
    }
}

/// Immutable lookup of condition and action definitions by reference id.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    conditions: Vec<ConditionDefinition>,
    actions: Vec<ActionDefinition>,

    // Indexes
    condition_index: HashMap<String, usize>,
    action_index: HashMap<String, usize>,
}

impl RuleCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_CATALOG) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("built-in catalog failed to load: {e}");
                Self::default()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load a catalog leniently, discarding the load report.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        Self::from_json_with_report(text).map(|(catalog, _)| catalog)
    }

    /// Load a catalog leniently.
    ///
    /// Only invalid JSON is an error. A document of the wrong shape yields an
    /// empty catalog, and individual bad records are dropped, logged, and
    /// listed in the returned [`LoadReport`].
    pub fn from_json_with_report(text: &str) -> CoreResult<(Self, LoadReport)> {
        let document: Value = serde_json::from_str(text)?;
        let mut catalog = Self::new();
        let mut report = LoadReport::default();

        let Some((conditions, actions)) = split_document(&document) else {
            warn!("catalog document has an unexpected shape; loading nothing");
            return Ok((catalog, report));
        };

        for (index, value) in conditions.iter().enumerate() {
            let outcome = match ConditionDefinition::from_record(value) {
                None => Err("not an object".to_string()),
                Some(def) if def.reference_id.is_empty() => Err("empty reference id".to_string()),
                Some(def) => catalog.add_condition(def).map_err(|e| e.to_string()),
            };
            match outcome {
                Ok(()) => report.conditions_loaded += 1,
                Err(reason) => report.record_drop(RecordList::Conditions, index, reason),
            }
        }

        for (index, value) in actions.iter().enumerate() {
            let outcome = match ActionDefinition::from_record(value) {
                None => Err("not an object".to_string()),
                Some(def) if def.reference_id.is_empty() => Err("empty reference id".to_string()),
                Some(def) => catalog.add_action(def).map_err(|e| e.to_string()),
            };
            match outcome {
                Ok(()) => report.actions_loaded += 1,
                Err(reason) => report.record_drop(RecordList::Actions, index, reason),
            }
        }

        debug!(
            conditions = report.conditions_loaded,
            actions = report.actions_loaded,
            dropped = report.dropped.len(),
            "catalog loaded"
        );
        Ok((catalog, report))
    }

    /// Load a catalog, failing on the first malformed, empty, or duplicate record.
    pub fn from_json_strict(text: &str) -> CoreResult<Self> {
        let document: Value = serde_json::from_str(text)?;
        let (conditions, actions) = split_document(&document).ok_or(CoreError::UnexpectedShape)?;
        let mut catalog = Self::new();

        for (index, value) in conditions.iter().enumerate() {
            let def: ConditionDefinition =
                serde_json::from_value(value.clone()).map_err(|e| CoreError::MalformedRecord {
                    index,
                    reason: e.to_string(),
                })?;
            if def.reference_id.is_empty() {
                return Err(CoreError::EmptyReference { index });
            }
            catalog.add_condition(def)?;
        }

        for (index, value) in actions.iter().enumerate() {
            let def: ActionDefinition =
                serde_json::from_value(value.clone()).map_err(|e| CoreError::MalformedRecord {
                    index,
                    reason: e.to_string(),
                })?;
            if def.reference_id.is_empty() {
                return Err(CoreError::EmptyReference { index });
            }
            catalog.add_action(def)?;
        }

        Ok(catalog)
    }

    /// Load a catalog file leniently.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        Self::from_json(&read_catalog(path)?)
    }

    /// Load a catalog file strictly.
    pub fn from_path_strict(path: &Path) -> CoreResult<Self> {
        Self::from_json_strict(&read_catalog(path)?)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Add a condition. Reference ids must be non-empty and unique.
    pub fn add_condition(&mut self, def: ConditionDefinition) -> CoreResult<()> {
        if def.reference_id.is_empty() {
            return Err(CoreError::EmptyReference {
                index: self.conditions.len(),
            });
        }
        if self.condition_index.contains_key(&def.reference_id) {
            return Err(CoreError::DuplicateReference(def.reference_id));
        }
        self.condition_index
            .insert(def.reference_id.clone(), self.conditions.len());
        self.conditions.push(def);
        Ok(())
    }

    /// Add an action. Reference ids must be non-empty and unique.
    pub fn add_action(&mut self, def: ActionDefinition) -> CoreResult<()> {
        if def.reference_id.is_empty() {
            return Err(CoreError::EmptyReference {
                index: self.actions.len(),
            });
        }
        if self.action_index.contains_key(&def.reference_id) {
            return Err(CoreError::DuplicateReference(def.reference_id));
        }
        self.action_index
            .insert(def.reference_id.clone(), self.actions.len());
        self.actions.push(def);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Look up a condition by reference id (exact match).
    pub fn get(&self, reference_id: &str) -> Option<&ConditionDefinition> {
        self.condition_index
            .get(reference_id)
            .map(|&i| &self.conditions[i])
    }

    /// Returns true if a condition with this reference id exists.
    pub fn contains(&self, reference_id: &str) -> bool {
        self.condition_index.contains_key(reference_id)
    }

    /// All conditions in load order.
    pub fn conditions(&self) -> impl Iterator<Item = &ConditionDefinition> {
        self.conditions.iter()
    }

    /// Look up an action by reference id (exact match).
    pub fn action(&self, reference_id: &str) -> Option<&ActionDefinition> {
        self.action_index.get(reference_id).map(|&i| &self.actions[i])
    }

    /// All actions in load order.
    pub fn actions(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns true if the catalog has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Conditions whose reference id or display name contains `text`
    /// (case-insensitive), in load order.
    pub fn search(&self, text: &str) -> Vec<&ConditionDefinition> {
        let needle = text.to_lowercase();
        self.conditions
            .iter()
            .filter(|c| {
                c.reference_id.to_lowercase().contains(&needle)
                    || c.display_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Cascade and override targets that name no condition in this catalog.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for def in &self.conditions {
            for grant in &def.cascades {
                if !self.contains(&grant.reference_id) {
                    dangling.push(DanglingReference {
                        from: def.reference_id.clone(),
                        target: grant.reference_id.clone(),
                        kind: ReferenceKind::Cascade,
                    });
                }
            }
            for target in &def.overrides {
                if !self.contains(target) {
                    dangling.push(DanglingReference {
                        from: def.reference_id.clone(),
                        target: target.clone(),
                        kind: ReferenceKind::Override,
                    });
                }
            }
        }
        dangling
    }
}

impl LoadReport {
    fn record_drop(&mut self, list: RecordList, index: usize, reason: String) {
        warn!(%list, index, %reason, "dropping catalog record");
        self.dropped.push(DroppedRecord {
            list,
            index,
            reason,
        });
    }
}

/// Split a catalog document into its condition and action records.
///
/// A bare array holds conditions only; an object may carry `conditions`
/// and `actions` arrays. Anything else has no records.
fn split_document(document: &Value) -> Option<(&[Value], &[Value])> {
    match document {
        Value::Array(conditions) => Some((conditions.as_slice(), &[][..])),
        Value::Object(map) => Some((record_list(map, "conditions"), record_list(map, "actions"))),
        _ => None,
    }
}

fn record_list<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> &'a [Value] {
    match map.get(key) {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

fn read_catalog(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
