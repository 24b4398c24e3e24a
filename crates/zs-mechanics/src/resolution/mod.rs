//! Degree-of-success resolution for a single die plus modifier.
//!
//! The base tier is success when the total meets the difficulty and failure
//! otherwise. Each [`TierAdjustment`] in the resolver's list is then checked
//! independently and, when it fires, moves the tier one rung along
//! critical failure / failure / success / critical success, saturating at the
//! ends. Moving one rung from failure lands on success, so a tier is never 0.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use zs_core::Tier;

use crate::dice::Die;

/// A rule that can move the tier by one rung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierAdjustment {
    /// Beating the difficulty by the critical margin or more: one rung up.
    MarginAtLeast,
    /// Missing the difficulty by the critical margin or more: one rung down.
    MarginAtMost,
    /// Rolling the die's highest face: one rung up.
    NaturalMax,
    /// Rolling a 1: one rung down.
    NaturalMin,
}

/// The conventional adjustment order: margin first, then the natural face.
pub const STANDARD_ADJUSTMENTS: [TierAdjustment; 4] = [
    TierAdjustment::MarginAtLeast,
    TierAdjustment::MarginAtMost,
    TierAdjustment::NaturalMax,
    TierAdjustment::NaturalMin,
];

/// The result of resolving one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Die face plus modifier.
    pub total: i32,
    /// The face shown on the die.
    pub raw_die: u32,
    /// Total minus difficulty.
    pub margin: i32,
    /// The degree of success.
    pub tier: Tier,
}

impl RollOutcome {
    /// The modifier that was added to the die.
    pub fn modifier(&self) -> i32 {
        self.total.saturating_sub(face_value(self.raw_die))
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:+} = {} (margin {:+}): {}",
            self.raw_die,
            self.modifier(),
            self.total,
            self.margin,
            self.tier
        )
    }
}

/// Turns a die face, a modifier, and a difficulty into a [`RollOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeResolver {
    /// The die being rolled; its highest face triggers [`TierAdjustment::NaturalMax`].
    pub die: Die,
    /// Margin at which the margin adjustments fire (default 10).
    pub critical_margin: i32,
    /// Adjustments applied in order. Reorder to change tie-breaks.
    pub adjustments: Vec<TierAdjustment>,
}

impl Default for OutcomeResolver {
    fn default() -> Self {
        Self {
            die: Die::D20,
            critical_margin: 10,
            adjustments: STANDARD_ADJUSTMENTS.to_vec(),
        }
    }
}

impl OutcomeResolver {
    /// A d20 resolver with the standard adjustments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different die.
    pub fn with_die(mut self, die: Die) -> Self {
        self.die = die;
        self
    }

    /// Use a different critical margin.
    pub fn with_critical_margin(mut self, margin: i32) -> Self {
        self.critical_margin = margin;
        self
    }

    /// Replace the adjustment list.
    pub fn with_adjustments(mut self, adjustments: impl Into<Vec<TierAdjustment>>) -> Self {
        self.adjustments = adjustments.into();
        self
    }

    /// Resolve a roll. Pure and total over its inputs.
    pub fn resolve(&self, raw_die: u32, modifier: i32, difficulty: i32) -> RollOutcome {
        let total = face_value(raw_die).saturating_add(modifier);
        let margin = total.saturating_sub(difficulty);

        let mut tier = if margin >= 0 {
            Tier::Success
        } else {
            Tier::Failure
        };

        for adjustment in &self.adjustments {
            tier = match adjustment {
                TierAdjustment::MarginAtLeast if margin >= self.critical_margin => tier.step_up(),
                TierAdjustment::MarginAtMost if margin <= self.critical_margin.saturating_neg() => {
                    tier.step_down()
                }
                TierAdjustment::NaturalMax if raw_die == self.die.sides() => tier.step_up(),
                TierAdjustment::NaturalMin if raw_die == 1 => tier.step_down(),
                _ => tier,
            };
        }

        RollOutcome {
            total,
            raw_die,
            margin,
            tier,
        }
    }

    /// Roll the die and resolve the result.
    pub fn roll(&self, rng: &mut StdRng, modifier: i32, difficulty: i32) -> RollOutcome {
        self.resolve(self.die.roll(rng), modifier, difficulty)
    }
}

/// Resolve a d20 roll with the standard adjustments.
pub fn resolve(raw_die: u32, modifier: i32, difficulty: i32) -> RollOutcome {
    OutcomeResolver::default().resolve(raw_die, modifier, difficulty)
}

fn face_value(raw_die: u32) -> i32 {
    i32::try_from(raw_die).unwrap_or(i32::MAX)
}
