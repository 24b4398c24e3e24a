//! Configuration for a tracking session.

use zs_mechanics::{EngineConfig, LevelPolicy};

/// Configuration for a tracking session.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// RNG seed for reproducible rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Condition engine settings.
    pub engine: EngineConfig,
}

impl TrackerConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject negative or fractional levels instead of coercing them.
    pub fn with_strict_levels(mut self) -> Self {
        self.engine = self.engine.with_level_policy(LevelPolicy::Strict);
        self
    }

    /// Limit how often the level prompt is asked per condition.
    pub fn with_max_prompt_attempts(mut self, attempts: u32) -> Self {
        self.engine = self.engine.with_max_prompt_attempts(attempts);
        self
    }
}
