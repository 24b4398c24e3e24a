//! Core types for Zustand: the rule catalog and per-entity condition state.
//!
//! This crate holds the data model the engine operates on. It has no
//! behavior beyond loading and bookkeeping; stacking and cascading live in
//! `zs-mechanics`.

/// Actions whose effects depend on the degree of success.
pub mod action;
/// The immutable rule catalog and its loaders.
pub mod catalog;
/// Condition definitions and cascade grants.
pub mod condition;
/// Error types used throughout the crate.
pub mod error;
mod record;
/// Conditions currently active on an entity.
pub mod state;
/// The four degrees of success.
pub mod tier;

/// Re-export action types.
pub use action::{ActionDefinition, ActionEffects};
/// Re-export catalog types.
pub use catalog::{DanglingReference, LoadReport, ReferenceKind, RuleCatalog};
/// Re-export condition definition types.
pub use condition::{CascadeGrant, ConditionDefinition};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export state types.
pub use state::{AppliedCondition, ConditionState};
/// Re-export the degree of success.
pub use tier::Tier;
