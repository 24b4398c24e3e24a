//! Dice types and rolling.
//!
//! This is the RNG boundary: everything downstream of a roll works on plain
//! face values, so resolution stays a pure function.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// A single die with at least two faces, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Die(u32);

impl Die {
    /// Six-sided die.
    pub const D6: Self = Self(6);
    /// Twenty-sided die, the check die.
    pub const D20: Self = Self(20);

    /// A die with `sides` faces. Fewer than two faces is not a die.
    pub fn new(sides: u32) -> Option<Self> {
        (sides >= 2).then_some(Self(sides))
    }

    /// Number of faces, which is also the natural maximum.
    pub fn sides(self) -> u32 {
        self.0
    }

    /// Parse dice notation such as `d20` or `D6`.
    pub fn parse(s: &str) -> MechResult<Self> {
        s.trim()
            .strip_prefix(['d', 'D'])
            .and_then(|sides| sides.parse().ok())
            .and_then(Self::new)
            .ok_or_else(|| MechError::InvalidDie(s.to_string()))
    }

    /// Roll the die: a uniform face in `1..=sides`.
    pub fn roll(self, rng: &mut StdRng) -> u32 {
        rng.random_range(1..=self.0)
    }
}

impl Default for Die {
    fn default() -> Self {
        Self::D20
    }
}

impl TryFrom<u32> for Die {
    type Error = MechError;

    fn try_from(sides: u32) -> MechResult<Self> {
        Self::new(sides).ok_or_else(|| MechError::InvalidDie(format!("d{sides}")))
    }
}

impl From<Die> for u32 {
    fn from(die: Die) -> Self {
        die.0
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.0)
    }
}
