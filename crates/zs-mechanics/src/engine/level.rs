//! Turning raw numeric input into a level.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// What to do with a level that is negative, fractional, or not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPolicy {
    /// Floor fractions; treat negative and non-finite values as 0.
    #[default]
    Coerce,
    /// Reject anything that is not a non-negative whole number.
    Strict,
}

impl LevelPolicy {
    /// Convert a raw value into a level.
    pub fn accept(self, raw: f64) -> MechResult<u32> {
        let whole = raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0;
        match self {
            _ if whole => Ok(raw.min(f64::from(u32::MAX)) as u32),
            Self::Coerce if raw.is_finite() && raw > 0.0 => {
                Ok(raw.floor().min(f64::from(u32::MAX)) as u32)
            }
            Self::Coerce => Ok(0),
            Self::Strict => Err(MechError::InvalidLevel(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_pass_both_policies() {
        for policy in [LevelPolicy::Coerce, LevelPolicy::Strict] {
            assert_eq!(policy.accept(0.0).unwrap(), 0);
            assert_eq!(policy.accept(3.0).unwrap(), 3);
        }
    }

    #[test]
    fn coerce_degrades_to_zero() {
        let policy = LevelPolicy::Coerce;
        assert_eq!(policy.accept(-2.0).unwrap(), 0);
        assert_eq!(policy.accept(f64::NAN).unwrap(), 0);
        assert_eq!(policy.accept(f64::INFINITY).unwrap(), 0);
        assert_eq!(policy.accept(2.9).unwrap(), 2);
    }

    #[test]
    fn strict_rejects() {
        let policy = LevelPolicy::Strict;
        assert!(matches!(policy.accept(-1.0), Err(MechError::InvalidLevel(_))));
        assert!(policy.accept(f64::NAN).is_err());
        assert!(policy.accept(1.5).is_err());
    }

    #[test]
    fn huge_values_clamp() {
        assert_eq!(LevelPolicy::Coerce.accept(1e12).unwrap(), u32::MAX);
    }
}
