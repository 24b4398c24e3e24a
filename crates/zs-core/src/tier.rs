//! Degrees of success.
//!
//! Every check in the rules lands on one of four rungs. There is no neutral
//! rung, so a tier can never be zero.

use serde::{Deserialize, Serialize};

/// The four-step degree of success of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Failed by a wide margin, or worse.
    CriticalFailure,
    /// Missed the difficulty.
    Failure,
    /// Met or beat the difficulty.
    Success,
    /// Beat the difficulty by a wide margin, or better.
    CriticalSuccess,
}

impl Tier {
    /// The signed value of this tier: -2, -1, 1, or 2.
    pub fn value(self) -> i8 {
        match self {
            Self::CriticalFailure => -2,
            Self::Failure => -1,
            Self::Success => 1,
            Self::CriticalSuccess => 2,
        }
    }

    /// One rung better, saturating at critical success.
    pub fn step_up(self) -> Self {
        match self {
            Self::CriticalFailure => Self::Failure,
            Self::Failure => Self::Success,
            Self::Success | Self::CriticalSuccess => Self::CriticalSuccess,
        }
    }

    /// One rung worse, saturating at critical failure.
    pub fn step_down(self) -> Self {
        match self {
            Self::CriticalSuccess => Self::Success,
            Self::Success => Self::Failure,
            Self::Failure | Self::CriticalFailure => Self::CriticalFailure,
        }
    }

    /// Returns true for success and critical success.
    pub fn is_success(self) -> bool {
        self.value() > 0
    }

    /// Returns true for either critical tier.
    pub fn is_critical(self) -> bool {
        self.value().abs() == 2
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalFailure => write!(f, "Critical Failure"),
            Self::Failure => write!(f, "Failure"),
            Self::Success => write!(f, "Success"),
            Self::CriticalSuccess => write!(f, "Critical Success"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_skip_zero() {
        assert_eq!(Tier::CriticalFailure.value(), -2);
        assert_eq!(Tier::Failure.value(), -1);
        assert_eq!(Tier::Success.value(), 1);
        assert_eq!(Tier::CriticalSuccess.value(), 2);
    }

    #[test]
    fn stepping_crosses_from_failure_to_success() {
        assert_eq!(Tier::Failure.step_up(), Tier::Success);
        assert_eq!(Tier::Success.step_down(), Tier::Failure);
    }

    #[test]
    fn stepping_saturates() {
        assert_eq!(Tier::CriticalSuccess.step_up(), Tier::CriticalSuccess);
        assert_eq!(Tier::CriticalFailure.step_down(), Tier::CriticalFailure);
    }

    #[test]
    fn ordering_follows_ladder() {
        assert!(Tier::CriticalFailure < Tier::Failure);
        assert!(Tier::Failure < Tier::Success);
        assert!(Tier::Success < Tier::CriticalSuccess);
    }

    #[test]
    fn predicates() {
        assert!(Tier::Success.is_success());
        assert!(!Tier::Failure.is_success());
        assert!(Tier::CriticalFailure.is_critical());
        assert!(!Tier::Success.is_critical());
    }

    #[test]
    fn display() {
        assert_eq!(Tier::CriticalSuccess.to_string(), "Critical Success");
        assert_eq!(Tier::Failure.to_string(), "Failure");
    }
}
