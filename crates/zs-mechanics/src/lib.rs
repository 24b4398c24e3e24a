//! Condition mechanics for Zustand.
//!
//! Provides the condition engine (stacking, cascades, level prompts), dice
//! rolling, and the four-tier degree-of-success resolver.

pub mod dice;
pub mod engine;
pub mod error;
pub mod resolution;

pub use dice::Die;
pub use engine::{
    ApplyOutcome, ConditionEngine, EngineConfig, LevelPolicy, LevelPrompt, NoPrompt, PromptReply,
    ScriptedPrompt,
};
pub use error::{MechError, MechResult};
pub use resolution::{OutcomeResolver, RollOutcome, STANDARD_ADJUSTMENTS, TierAdjustment, resolve};
pub use zs_core::Tier;
