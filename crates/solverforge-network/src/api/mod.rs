//! Score query surface of a built network.
//!
//! - Analysis types for score explanation and indictments
//! - Constraint weight overrides

pub mod analysis;
pub mod weight_overrides;

#[cfg(test)]
mod tests;

pub use analysis::{
    ConstraintAnalysis, ConstraintJustification, DetailedConstraintMatch, EntityRef, Indictment,
    IndictmentMap, ScoreExplanation,
};
pub use weight_overrides::ConstraintWeightOverrides;
