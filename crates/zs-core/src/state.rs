//! The set of conditions currently active on one entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A condition active on an entity.
///
/// `level` is 0 for binary conditions. An incremental condition never rests
/// at 0: dropping to 0 removes it instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppliedCondition {
    /// Reference id, normally matching a catalog entry.
    pub reference_id: String,
    /// Severity level, or 0 for a binary condition.
    pub level: u32,
}

impl AppliedCondition {
    /// Create an applied condition.
    pub fn new(reference_id: impl Into<String>, level: u32) -> Self {
        Self {
            reference_id: reference_id.into(),
            level,
        }
    }
}

impl fmt::Display for AppliedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.level > 0 {
            write!(f, "{} {}", self.reference_id, self.level)
        } else {
            write!(f, "{}", self.reference_id)
        }
    }
}

/// Ordered, reference-unique collection of applied conditions.
///
/// Order is application order and exists only for stable enumeration; it
/// carries no precedence.
///
/// Snapshots that repeat a reference id are rejected on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StateSnapshot")]
pub struct ConditionState {
    conditions: Vec<AppliedCondition>,
}

/// Wire form of a [`ConditionState`], validated before use.
#[derive(Deserialize)]
struct StateSnapshot {
    conditions: Vec<AppliedCondition>,
}

impl TryFrom<StateSnapshot> for ConditionState {
    type Error = CoreError;

    fn try_from(snapshot: StateSnapshot) -> Result<Self, Self::Error> {
        let mut state = Self::new();
        for condition in snapshot.conditions {
            let reference_id = condition.reference_id.clone();
            if !state.insert(condition) {
                return Err(CoreError::DuplicateReference(reference_id));
            }
        }
        Ok(state)
    }
}

impl ConditionState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a condition with this reference id is active.
    pub fn contains(&self, reference_id: &str) -> bool {
        self.position(reference_id).is_some()
    }

    /// Get an active condition by reference id.
    pub fn get(&self, reference_id: &str) -> Option<&AppliedCondition> {
        self.conditions
            .iter()
            .find(|c| c.reference_id == reference_id)
    }

    /// The stored level of an active condition.
    pub fn level(&self, reference_id: &str) -> Option<u32> {
        self.get(reference_id).map(|c| c.level)
    }

    /// Append a condition. Returns false, leaving the state unchanged, if the
    /// reference id is already active.
    pub fn insert(&mut self, condition: AppliedCondition) -> bool {
        if self.contains(&condition.reference_id) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    /// Overwrite the level of an active condition. Returns the previous level.
    pub fn set_level(&mut self, reference_id: &str, level: u32) -> Option<u32> {
        let condition = self
            .conditions
            .iter_mut()
            .find(|c| c.reference_id == reference_id)?;
        Some(std::mem::replace(&mut condition.level, level))
    }

    /// Remove a condition. Removing an absent reference id is a no-op.
    pub fn remove(&mut self, reference_id: &str) -> Option<AppliedCondition> {
        let index = self.position(reference_id)?;
        Some(self.conditions.remove(index))
    }

    /// Remove every condition.
    pub fn clear(&mut self) {
        self.conditions.clear();
    }

    /// Active conditions in application order.
    pub fn iter(&self) -> impl Iterator<Item = &AppliedCondition> {
        self.conditions.iter()
    }

    /// Active conditions as a slice, in application order.
    pub fn as_slice(&self) -> &[AppliedCondition] {
        &self.conditions
    }

    /// Reference ids in application order.
    pub fn reference_ids(&self) -> Vec<&str> {
        self.conditions
            .iter()
            .map(|c| c.reference_id.as_str())
            .collect()
    }

    /// Number of active conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns true if nothing is active.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn position(&self, reference_id: &str) -> Option<usize> {
        self.conditions
            .iter()
            .position(|c| c.reference_id == reference_id)
    }
}

impl<'a> IntoIterator for &'a ConditionState {
    type Item = &'a AppliedCondition;
    type IntoIter = std::slice::Iter<'a, AppliedCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}
