//! HardSoftDecimalScore - Two-level score with arbitrary-precision levels
//!
//! Levels are [`Decimal`] values, so fractional penalties such as 30.5 minutes
//! of overlap keep their exact value through every add and subtract.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;

use super::traits::{ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A score with separate hard and soft constraint levels backed by [`Decimal`].
///
/// # Examples
///
/// ```
/// use solverforge_core::{Decimal, HardSoftDecimalScore, Score};
///
/// let score = HardSoftDecimalScore::of(Decimal::new(-305, 1), Decimal::ZERO);
/// assert!(!score.is_feasible());
/// assert_eq!(format!("{}", score), "-30.5hard/0soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftDecimalScore {
    hard: Decimal,
    soft: Decimal,
}

impl HardSoftDecimalScore {
    /// The zero score.
    pub const ZERO: HardSoftDecimalScore = HardSoftDecimalScore {
        hard: Decimal::ZERO,
        soft: Decimal::ZERO,
    };

    /// One hard constraint unit.
    pub const ONE_HARD: HardSoftDecimalScore = HardSoftDecimalScore {
        hard: Decimal::ONE,
        soft: Decimal::ZERO,
    };

    /// One soft constraint unit.
    pub const ONE_SOFT: HardSoftDecimalScore = HardSoftDecimalScore {
        hard: Decimal::ZERO,
        soft: Decimal::ONE,
    };

    #[inline]
    pub const fn of(hard: Decimal, soft: Decimal) -> Self {
        HardSoftDecimalScore { hard, soft }
    }

    /// Creates a score from whole-number levels.
    ///
    /// ```
    /// use solverforge_core::{Decimal, HardSoftDecimalScore};
    ///
    /// let score = HardSoftDecimalScore::of_ints(-2, -100);
    /// assert_eq!(score.hard(), Decimal::from(-2));
    /// ```
    pub fn of_ints(hard: i64, soft: i64) -> Self {
        HardSoftDecimalScore::of(Decimal::from(hard), Decimal::from(soft))
    }

    #[inline]
    pub const fn of_hard(hard: Decimal) -> Self {
        HardSoftDecimalScore::of(hard, Decimal::ZERO)
    }

    #[inline]
    pub const fn of_soft(soft: Decimal) -> Self {
        HardSoftDecimalScore::of(Decimal::ZERO, soft)
    }

    #[inline]
    pub const fn hard(&self) -> Decimal {
        self.hard
    }

    #[inline]
    pub const fn soft(&self) -> Decimal {
        self.soft
    }

    /// Returns true if the hard level is non-zero.
    pub fn has_hard_component(&self) -> bool {
        !self.hard.is_zero()
    }
}

impl Score for HardSoftDecimalScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.hard >= Decimal::ZERO
    }

    #[inline]
    fn zero() -> Self {
        HardSoftDecimalScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        2
    }

    fn level_label(index: usize) -> ScoreLevel {
        match index {
            0 => ScoreLevel::Hard,
            1 => ScoreLevel::Soft,
            _ => panic!("HardSoftDecimalScore has 2 levels, got index {}", index),
        }
    }

    fn abs(&self) -> Self {
        HardSoftDecimalScore::of(self.hard.abs(), self.soft.abs())
    }
}

impl Ord for HardSoftDecimalScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => self.soft.cmp(&other.soft),
            other => other,
        }
    }
}

impl_score_ops!(HardSoftDecimalScore { hard, soft } => of);
impl_match_weighted_decimal!(HardSoftDecimalScore { hard, soft } => of);

impl fmt::Debug for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftDecimalScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trailing zeros stripped: 1.50 prints as 1.5
        write!(
            f,
            "{}hard/{}soft",
            self.hard.normalize(),
            self.soft.normalize()
        )
    }
}

impl ParseableScore for HardSoftDecimalScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let s = s.trim();
        let (hard_part, soft_part) = s.split_once('/').ok_or_else(|| {
            ScoreParseError::new(format!(
                "Invalid HardSoftDecimalScore format '{}': expected 2 parts separated by '/'",
                s
            ))
        })?;

        let level = |part: &str, suffix: &str| -> Result<Decimal, ScoreParseError> {
            let part = part.trim();
            let num_str = part.strip_suffix(suffix).ok_or_else(|| {
                ScoreParseError::new(format!("part '{}' must end with '{}'", part, suffix))
            })?;
            num_str.parse::<Decimal>().map_err(|e| {
                ScoreParseError::new(format!("Invalid {} score '{}': {}", suffix, num_str, e))
            })
        };

        Ok(HardSoftDecimalScore::of(
            level(hard_part, "hard")?,
            level(soft_part, "soft")?,
        ))
    }

    fn to_string_repr(&self) -> String {
        self.to_string()
    }
}
