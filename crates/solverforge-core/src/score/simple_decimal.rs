//! SimpleDecimalScore - Single-level arbitrary-precision score

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;

use super::traits::{ParseableScore, Score, ScoreParseError};
use super::ScoreLevel;

/// A single-level score backed by [`Decimal`].
///
/// ```
/// use solverforge_core::{Decimal, MatchWeighted, SimpleDecimalScore};
///
/// let weight = SimpleDecimalScore::of(Decimal::new(15, 1)); // 1.5
/// let impact = weight.weighted(Decimal::new(2, 0));
/// assert_eq!(impact.score(), Decimal::new(3, 0));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleDecimalScore {
    score: Decimal,
}

impl SimpleDecimalScore {
    pub const ZERO: SimpleDecimalScore = SimpleDecimalScore {
        score: Decimal::ZERO,
    };

    pub const ONE: SimpleDecimalScore = SimpleDecimalScore { score: Decimal::ONE };

    #[inline]
    pub const fn of(score: Decimal) -> Self {
        SimpleDecimalScore { score }
    }

    #[inline]
    pub const fn score(&self) -> Decimal {
        self.score
    }
}

impl Score for SimpleDecimalScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.score >= Decimal::ZERO
    }

    #[inline]
    fn zero() -> Self {
        SimpleDecimalScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        1
    }

    fn level_label(index: usize) -> ScoreLevel {
        match index {
            0 => ScoreLevel::Soft,
            _ => panic!("SimpleDecimalScore has 1 level, got index {}", index),
        }
    }

    fn abs(&self) -> Self {
        SimpleDecimalScore::of(self.score.abs())
    }
}

impl Ord for SimpleDecimalScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

impl_score_ops!(SimpleDecimalScore { score } => of);
impl_match_weighted_decimal!(SimpleDecimalScore { score } => of);

impl fmt::Debug for SimpleDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimpleDecimalScore({})", self.score)
    }
}

impl fmt::Display for SimpleDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.score.normalize())
    }
}

impl ParseableScore for SimpleDecimalScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let s = s.trim();
        let s = s.strip_suffix("init").unwrap_or(s);

        s.parse::<Decimal>()
            .map(SimpleDecimalScore::of)
            .map_err(|e| ScoreParseError::new(format!("Invalid SimpleDecimalScore '{}': {}", s, e)))
    }

    fn to_string_repr(&self) -> String {
        self.score.normalize().to_string()
    }
}

impl From<Decimal> for SimpleDecimalScore {
    fn from(score: Decimal) -> Self {
        SimpleDecimalScore::of(score)
    }
}
