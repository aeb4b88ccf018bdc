//! SolverForge Core - Score and constraint identity types
//!
//! This crate provides the value types shared by the constraint network:
//! - Score types for representing solution quality
//! - Constraint references and impact classification
//! - Match-weight scaling of constraint weights

pub mod constraint;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use score::{
    HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, MatchWeighted, ParseableScore,
    Score, ScoreLevel, ScoreParseError, SimpleDecimalScore, SimpleScore,
};

/// Re-exported so decimal scores and weighers name the same type.
pub use rust_decimal::Decimal;
