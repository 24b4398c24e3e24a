//! Applying conditions to an entity.
//!
//! The engine implements stacking (incremental conditions only ever rise
//! through re-application), cascades (a condition grants others the first
//! time it becomes active), and termination: a condition is committed to the
//! state before its cascades run, and a cascade skips anything already
//! present, so cyclic grants stop on the second visit.

/// Conversion of raw numeric levels.
pub mod level;
/// The level prompt collaborator.
pub mod prompt;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use zs_core::{AppliedCondition, ConditionDefinition, ConditionState, RuleCatalog};

use crate::error::{MechError, MechResult};

pub use level::LevelPolicy;
pub use prompt::{LevelPrompt, NoPrompt, PromptReply, ScriptedPrompt};

/// Engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How raw numeric levels are converted.
    pub level_policy: LevelPolicy,
    /// Prompt requests allowed per condition before giving up. `None` asks forever.
    pub max_prompt_attempts: Option<u32>,
}

impl EngineConfig {
    /// Set the level policy.
    pub fn with_level_policy(mut self, policy: LevelPolicy) -> Self {
        self.level_policy = policy;
        self
    }

    /// Limit the number of prompt requests per condition.
    pub fn with_max_prompt_attempts(mut self, attempts: u32) -> Self {
        self.max_prompt_attempts = Some(attempts);
        self
    }
}

/// What a call to [`ConditionEngine::apply`] did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The condition was not active and has been added.
    Added {
        /// Stored level (0 for binary conditions).
        level: u32,
        /// Reference ids added by cascades, depth-first in application order.
        granted: Vec<String>,
    },
    /// An active incremental condition was raised.
    Raised {
        /// Previous level.
        from: u32,
        /// New level.
        to: u32,
    },
    /// The condition was already active and nothing changed.
    Unchanged,
    /// An active incremental condition was applied at level 0 and ended.
    Removed {
        /// Level it had before removal.
        level: u32,
    },
    /// The prompt was cancelled or gave up; nothing was applied.
    Declined,
    /// An absent incremental condition was applied at level 0.
    Ignored,
}

impl ApplyOutcome {
    /// Returns true if the state was modified.
    pub fn changed_state(&self) -> bool {
        matches!(
            self,
            Self::Added { .. } | Self::Raised { .. } | Self::Removed { .. }
        )
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { level, granted } => {
                if *level > 0 {
                    write!(f, "added at level {level}")?;
                } else {
                    write!(f, "added")?;
                }
                if !granted.is_empty() {
                    write!(f, ", also gained {}", granted.join(", "))?;
                }
                Ok(())
            }
            Self::Raised { from, to } => write!(f, "raised from {from} to {to}"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Removed { level } => write!(f, "removed (was {level})"),
            Self::Declined => write!(f, "declined"),
            Self::Ignored => write!(f, "ignored (level 0)"),
        }
    }
}

/// Applies and removes conditions against a shared, read-only catalog.
#[derive(Debug, Clone, Copy)]
pub struct ConditionEngine<'c> {
    catalog: &'c RuleCatalog,
    config: EngineConfig,
}

impl<'c> ConditionEngine<'c> {
    /// Create an engine with the default configuration.
    pub fn new(catalog: &'c RuleCatalog) -> Self {
        Self::with_config(catalog, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(catalog: &'c RuleCatalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// The catalog cascades are resolved against.
    pub fn catalog(&self) -> &'c RuleCatalog {
        self.catalog
    }

    /// The active configuration.
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Apply a condition to `state`.
    ///
    /// `requested` is the caller's level. `None` leaves it unspecified, which
    /// makes incremental conditions ask `prompt`. Binary conditions ignore it.
    pub fn apply(
        &self,
        state: &mut ConditionState,
        definition: &ConditionDefinition,
        requested: Option<u32>,
        prompt: &mut dyn LevelPrompt,
    ) -> ApplyOutcome {
        let mut added = Vec::new();
        match self.apply_inner(state, definition, requested, prompt, &mut added) {
            ApplyOutcome::Added { level, .. } => ApplyOutcome::Added {
                level,
                granted: added.split_off(1),
            },
            other => other,
        }
    }

    /// Look up `reference_id` in the catalog and apply it.
    pub fn apply_ref(
        &self,
        state: &mut ConditionState,
        reference_id: &str,
        requested: Option<u32>,
        prompt: &mut dyn LevelPrompt,
    ) -> MechResult<ApplyOutcome> {
        let definition = self
            .catalog
            .get(reference_id)
            .ok_or_else(|| MechError::UnknownReference(reference_id.to_string()))?;
        Ok(self.apply(state, definition, requested, prompt))
    }

    /// Apply with a raw numeric level, converted through the configured
    /// [`LevelPolicy`].
    pub fn apply_raw(
        &self,
        state: &mut ConditionState,
        definition: &ConditionDefinition,
        raw: Option<f64>,
        prompt: &mut dyn LevelPrompt,
    ) -> MechResult<ApplyOutcome> {
        let requested = raw
            .map(|value| self.config.level_policy.accept(value))
            .transpose()?;
        Ok(self.apply(state, definition, requested, prompt))
    }

    /// Remove a condition. Conditions it granted stay active.
    ///
    /// Returns true if something was removed.
    pub fn remove(&self, state: &mut ConditionState, reference_id: &str) -> bool {
        match state.remove(reference_id) {
            Some(removed) => {
                debug!(reference = %removed.reference_id, level = removed.level, "removed condition");
                true
            }
            None => {
                trace!(reference = reference_id, "remove: condition not active");
                false
            }
        }
    }

    fn apply_inner(
        &self,
        state: &mut ConditionState,
        definition: &ConditionDefinition,
        requested: Option<u32>,
        prompt: &mut dyn LevelPrompt,
        added: &mut Vec<String>,
    ) -> ApplyOutcome {
        let reference_id = definition.reference_id.as_str();
        let Some(level) = self.resolve_level(definition, requested, prompt) else {
            debug!(reference = reference_id, "no level given, condition not applied");
            return ApplyOutcome::Declined;
        };

        if let Some(existing) = state.level(reference_id) {
            if !definition.incremental {
                return ApplyOutcome::Unchanged;
            }
            if level < 1 {
                state.remove(reference_id);
                debug!(reference = reference_id, from = existing, "condition ended");
                return ApplyOutcome::Removed { level: existing };
            }
            if level > existing {
                state.set_level(reference_id, level);
                debug!(reference = reference_id, from = existing, to = level, "condition raised");
                return ApplyOutcome::Raised {
                    from: existing,
                    to: level,
                };
            }
            return ApplyOutcome::Unchanged;
        }

        if definition.incremental && level < 1 {
            return ApplyOutcome::Ignored;
        }

        state.insert(AppliedCondition::new(reference_id, level));
        added.push(reference_id.to_string());
        debug!(reference = reference_id, level, "condition added");

        for grant in &definition.cascades {
            let Some(gained) = self.catalog.get(&grant.reference_id) else {
                trace!(from = reference_id, target = %grant.reference_id, "cascade target not in catalog");
                continue;
            };
            if state.contains(&gained.reference_id) {
                trace!(from = reference_id, target = %gained.reference_id, "cascade target already active");
                continue;
            }
            let outcome = self.apply_inner(state, gained, grant.level, prompt, added);
            debug!(from = reference_id, target = %gained.reference_id, %outcome, "cascade");
        }

        ApplyOutcome::Added {
            level,
            granted: Vec::new(),
        }
    }

    fn resolve_level(
        &self,
        definition: &ConditionDefinition,
        requested: Option<u32>,
        prompt: &mut dyn LevelPrompt,
    ) -> Option<u32> {
        if !definition.incremental {
            return Some(0);
        }
        if requested.is_some() {
            return requested;
        }

        let mut attempts = 0u32;
        loop {
            if self
                .config
                .max_prompt_attempts
                .is_some_and(|max| attempts >= max)
            {
                warn!(reference = %definition.reference_id, attempts, "giving up on level prompt");
                return None;
            }
            attempts += 1;
            match prompt.request_level(definition) {
                PromptReply::Level(level) if level >= 1 => {
                    return Some(u32::try_from(level).unwrap_or(u32::MAX));
                }
                PromptReply::Level(level) => {
                    warn!(reference = %definition.reference_id, level, "level must be at least 1");
                }
                PromptReply::Invalid => {
                    warn!(reference = %definition.reference_id, "level prompt reply was not a number");
                }
                PromptReply::Cancelled => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zs_core::CascadeGrant;

    fn catalog() -> RuleCatalog {
        let mut catalog = RuleCatalog::new();
        let defs = [
            ConditionDefinition::new("off-guard", "Off-Guard"),
            ConditionDefinition::new("immobilized", "Immobilized"),
            ConditionDefinition::new("grabbed", "Grabbed")
                .grants(CascadeGrant::new("off-guard"))
                .grants(CascadeGrant::new("immobilized")),
            ConditionDefinition::new("frightened", "Frightened").incremental(),
            ConditionDefinition::new("clumsy", "Clumsy").incremental(),
            ConditionDefinition::new("encumbered", "Encumbered")
                .grants(CascadeGrant::at_level("clumsy", 1)),
            ConditionDefinition::new("a", "A").grants(CascadeGrant::at_level("b", 1)),
            ConditionDefinition::new("b", "B")
                .incremental()
                .grants(CascadeGrant::at_level("a", 1)),
            ConditionDefinition::new("self", "Self").grants(CascadeGrant::new("self")),
            ConditionDefinition::new("dying", "Dying")
                .incremental()
                .grants(CascadeGrant::new("unconscious")),
            ConditionDefinition::new("unconscious", "Unconscious")
                .grants(CascadeGrant::new("off-guard"))
                .grants(CascadeGrant::new("missing")),
            ConditionDefinition::new("stunned", "Stunned")
                .incremental()
                .grants(CascadeGrant::new("frightened"))
                .grants(CascadeGrant::new("off-guard")),
        ];
        for definition in defs {
            catalog.add_condition(definition).unwrap();
        }
        catalog
    }

    fn def<'a>(catalog: &'a RuleCatalog, id: &str) -> &'a ConditionDefinition {
        catalog.get(id).unwrap()
    }

    #[test]
    fn binary_condition_is_idempotent() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let first = engine.apply(&mut state, def(&catalog, "off-guard"), None, &mut NoPrompt);
        assert_eq!(
            first,
            ApplyOutcome::Added {
                level: 0,
                granted: vec![]
            }
        );
        let snapshot = state.clone();
        let second = engine.apply(&mut state, def(&catalog, "off-guard"), Some(3), &mut NoPrompt);
        assert_eq!(second, ApplyOutcome::Unchanged);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn binary_condition_ignores_requested_level() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        engine.apply(&mut state, def(&catalog, "off-guard"), Some(4), &mut NoPrompt);
        assert_eq!(state.level("off-guard"), Some(0));
    }

    #[test]
    fn incremental_only_rises() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let frightened = def(&catalog, "frightened");
        let mut state = ConditionState::new();

        engine.apply(&mut state, frightened, Some(1), &mut NoPrompt);
        assert_eq!(
            engine.apply(&mut state, frightened, Some(3), &mut NoPrompt),
            ApplyOutcome::Raised { from: 1, to: 3 }
        );
        assert_eq!(
            engine.apply(&mut state, frightened, Some(2), &mut NoPrompt),
            ApplyOutcome::Unchanged
        );
        assert_eq!(
            engine.apply(&mut state, frightened, Some(3), &mut NoPrompt),
            ApplyOutcome::Unchanged
        );
        assert_eq!(state.level("frightened"), Some(3));
    }

    #[test]
    fn zero_level_removes_active_incremental() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let frightened = def(&catalog, "frightened");
        let mut state = ConditionState::new();

        engine.apply(&mut state, frightened, Some(2), &mut NoPrompt);
        assert_eq!(
            engine.apply(&mut state, frightened, Some(0), &mut NoPrompt),
            ApplyOutcome::Removed { level: 2 }
        );
        assert!(state.is_empty());
    }

    #[test]
    fn zero_level_on_absent_incremental_is_ignored() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let outcome = engine.apply(&mut state, def(&catalog, "frightened"), Some(0), &mut NoPrompt);
        assert_eq!(outcome, ApplyOutcome::Ignored);
        assert!(!outcome.changed_state());
        assert!(state.is_empty());
    }

    #[test]
    fn cascade_adds_granted_conditions() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let outcome = engine.apply(&mut state, def(&catalog, "grabbed"), None, &mut NoPrompt);
        assert_eq!(
            outcome,
            ApplyOutcome::Added {
                level: 0,
                granted: vec!["off-guard".into(), "immobilized".into()]
            }
        );
        assert_eq!(state.reference_ids(), vec!["grabbed", "off-guard", "immobilized"]);
    }

    #[test]
    fn cascade_uses_grant_level() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        engine.apply(&mut state, def(&catalog, "encumbered"), None, &mut NoPrompt);
        assert_eq!(state.level("clumsy"), Some(1));
    }

    #[test]
    fn cascade_does_not_touch_active_conditions() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        engine.apply(&mut state, def(&catalog, "clumsy"), Some(3), &mut NoPrompt);
        let outcome = engine.apply(&mut state, def(&catalog, "encumbered"), None, &mut NoPrompt);
        assert_eq!(
            outcome,
            ApplyOutcome::Added {
                level: 0,
                granted: vec![]
            }
        );
        assert_eq!(state.level("clumsy"), Some(3));
    }

    #[test]
    fn cyclic_cascade_terminates() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let outcome = engine.apply(&mut state, def(&catalog, "a"), None, &mut NoPrompt);
        assert_eq!(
            outcome,
            ApplyOutcome::Added {
                level: 0,
                granted: vec!["b".into()]
            }
        );
        assert_eq!(state.reference_ids(), vec!["a", "b"]);
        assert_eq!(state.level("b"), Some(1));

        let mut state = ConditionState::new();
        engine.apply(&mut state, def(&catalog, "b"), Some(2), &mut NoPrompt);
        assert_eq!(state.reference_ids(), vec!["b", "a"]);
    }

    #[test]
    fn self_cascade_terminates() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        engine.apply(&mut state, def(&catalog, "self"), None, &mut NoPrompt);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn nested_cascade_is_depth_first_and_skips_unknown() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let outcome = engine.apply(&mut state, def(&catalog, "dying"), Some(1), &mut NoPrompt);
        assert_eq!(
            outcome,
            ApplyOutcome::Added {
                level: 1,
                granted: vec!["unconscious".into(), "off-guard".into()]
            }
        );
        assert!(!state.contains("missing"));
    }

    #[test]
    fn prompt_supplies_missing_level() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let mut prompt = ScriptedPrompt::levels([2]);
        engine.apply(&mut state, def(&catalog, "frightened"), None, &mut prompt);
        assert_eq!(state.level("frightened"), Some(2));
        assert_eq!(prompt.asked(), ["frightened"]);
    }

    #[test]
    fn prompt_retries_invalid_replies() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let mut prompt = ScriptedPrompt::new([
            PromptReply::Invalid,
            PromptReply::Level(0),
            PromptReply::Level(-3),
            PromptReply::Level(4),
        ]);
        engine.apply(&mut state, def(&catalog, "frightened"), None, &mut prompt);
        assert_eq!(state.level("frightened"), Some(4));
        assert_eq!(prompt.asked().len(), 4);
    }

    #[test]
    fn prompt_is_asked_even_when_condition_is_active() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        engine.apply(&mut state, def(&catalog, "frightened"), Some(1), &mut NoPrompt);
        let mut prompt = ScriptedPrompt::levels([3]);
        let outcome = engine.apply(&mut state, def(&catalog, "frightened"), None, &mut prompt);
        assert_eq!(outcome, ApplyOutcome::Raised { from: 1, to: 3 });
    }

    #[test]
    fn cancelled_prompt_declines() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let outcome = engine.apply(&mut state, def(&catalog, "frightened"), None, &mut NoPrompt);
        assert_eq!(outcome, ApplyOutcome::Declined);
        assert!(state.is_empty());
    }

    #[test]
    fn declined_cascade_keeps_parent() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let mut prompt = ScriptedPrompt::default();
        let outcome = engine.apply(&mut state, def(&catalog, "stunned"), Some(2), &mut prompt);
        assert_eq!(
            outcome,
            ApplyOutcome::Added {
                level: 2,
                granted: vec!["off-guard".into()]
            }
        );
        assert_eq!(state.reference_ids(), vec!["stunned", "off-guard"]);
        assert_eq!(prompt.asked(), ["frightened"]);
    }

    #[test]
    fn max_prompt_attempts_gives_up() {
        let catalog = catalog();
        let config = EngineConfig::default().with_max_prompt_attempts(2);
        let engine = ConditionEngine::with_config(&catalog, config);
        let mut state = ConditionState::new();
        let mut prompt = |_: &ConditionDefinition| PromptReply::Invalid;
        let outcome = engine.apply(&mut state, def(&catalog, "frightened"), None, &mut prompt);
        assert_eq!(outcome, ApplyOutcome::Declined);

        let engine = ConditionEngine::with_config(
            &catalog,
            EngineConfig::default().with_max_prompt_attempts(0),
        );
        let mut scripted = ScriptedPrompt::levels([2]);
        let outcome = engine.apply(&mut state, def(&catalog, "frightened"), None, &mut scripted);
        assert_eq!(outcome, ApplyOutcome::Declined);
        assert!(scripted.asked().is_empty());
    }

    #[test]
    fn apply_ref_rejects_unknown() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let err = engine
            .apply_ref(&mut state, "nonexistent", None, &mut NoPrompt)
            .unwrap_err();
        assert!(matches!(err, MechError::UnknownReference(ref id) if id == "nonexistent"));
        assert!(state.is_empty());

        let outcome = engine
            .apply_ref(&mut state, "frightened", Some(2), &mut NoPrompt)
            .unwrap();
        assert!(outcome.changed_state());
    }

    #[test]
    fn apply_raw_follows_policy() {
        let catalog = catalog();
        let frightened = def(&catalog, "frightened");
        let mut state = ConditionState::new();

        let coerce = ConditionEngine::new(&catalog);
        coerce
            .apply_raw(&mut state, frightened, Some(2.7), &mut NoPrompt)
            .unwrap();
        assert_eq!(state.level("frightened"), Some(2));
        let outcome = coerce
            .apply_raw(&mut state, frightened, Some(f64::NAN), &mut NoPrompt)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Removed { level: 2 });

        let strict = ConditionEngine::with_config(
            &catalog,
            EngineConfig::default().with_level_policy(LevelPolicy::Strict),
        );
        let err = strict
            .apply_raw(&mut state, frightened, Some(-1.0), &mut NoPrompt)
            .unwrap_err();
        assert!(matches!(err, MechError::InvalidLevel(_)));
        assert!(state.is_empty());
    }

    #[test]
    fn remove_does_not_reverse_cascades() {
        let catalog = catalog();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        engine.apply(&mut state, def(&catalog, "grabbed"), None, &mut NoPrompt);
        assert!(engine.remove(&mut state, "grabbed"));
        assert_eq!(state.reference_ids(), vec!["off-guard", "immobilized"]);
        assert!(!engine.remove(&mut state, "grabbed"));
    }

    #[test]
    fn freestanding_definition_applies() {
        let catalog = RuleCatalog::new();
        let engine = ConditionEngine::new(&catalog);
        let mut state = ConditionState::new();
        let custom = ConditionDefinition::new("hexed", "Hexed").grants(CascadeGrant::new("off-guard"));
        engine.apply(&mut state, &custom, None, &mut NoPrompt);
        assert_eq!(state.reference_ids(), vec!["hexed"]);
    }

    #[test]
    fn outcome_display() {
        let outcome = ApplyOutcome::Added {
            level: 0,
            granted: vec!["off-guard".into()],
        };
        assert_eq!(outcome.to_string(), "added, also gained off-guard");
        assert_eq!(
            ApplyOutcome::Raised { from: 1, to: 2 }.to_string(),
            "raised from 1 to 2"
        );
    }

    proptest! {
        #[test]
        fn state_invariants_hold(ops in prop::collection::vec((0usize..12, prop::option::of(0u32..5)), 0..40)) {
            let catalog = catalog();
            let engine = ConditionEngine::new(&catalog);
            let ids: Vec<String> = catalog.conditions().map(|c| c.reference_id.clone()).collect();
            let mut state = ConditionState::new();
            for (index, level) in ops {
                let definition = def(&catalog, &ids[index % ids.len()]);
                engine.apply(&mut state, definition, level, &mut NoPrompt);
            }
            let mut seen = state.reference_ids();
            let total = seen.len();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), total);
            for applied in &state {
                let incremental = def(&catalog, &applied.reference_id).incremental;
                prop_assert_eq!(incremental, applied.level > 0);
            }
        }

        #[test]
        fn binary_reapplication_is_idempotent(index in 0usize..12) {
            let catalog = catalog();
            let engine = ConditionEngine::new(&catalog);
            let ids: Vec<String> = catalog.conditions().map(|c| c.reference_id.clone()).collect();
            let definition = def(&catalog, &ids[index % ids.len()]);
            prop_assume!(!definition.incremental);
            let mut once = ConditionState::new();
            engine.apply(&mut once, definition, None, &mut NoPrompt);
            let mut twice = once.clone();
            engine.apply(&mut twice, definition, None, &mut NoPrompt);
            prop_assert_eq!(once, twice);
        }
    }
}
