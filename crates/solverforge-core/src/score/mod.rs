//! Score types for representing solution quality
//!
//! Scores are summed by constraint terminals and compared level by level.
//! All score types are immutable values and implement arithmetic operations.

#[macro_use]
mod macros;

mod hard_medium_soft;
mod hard_soft;
mod hard_soft_decimal;
mod level;
mod simple;
mod simple_decimal;
mod traits;


pub use hard_medium_soft::HardMediumSoftScore;
pub use hard_soft::HardSoftScore;
pub use hard_soft_decimal::HardSoftDecimalScore;
pub use level::ScoreLevel;
pub use simple::SimpleScore;
pub use simple_decimal::SimpleDecimalScore;
pub use traits::{MatchWeighted, ParseableScore, Score, ScoreParseError};
