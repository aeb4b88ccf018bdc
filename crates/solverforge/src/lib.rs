//! SolverForge - Incremental constraint scoring in Rust
//!
//! Define constraints as streams over fact classes, build the network once
//! and feed it fact changes; the score follows incrementally.
//!
//! # Example
//!
//! ```rust
//! use solverforge::prelude::*;
//!
//! #[derive(Clone, Debug)]
//! struct Shift { employee: u32, start: i64, end: i64 }
//!
//! let factory = ConstraintFactory::<HardSoftScore>::new();
//! factory
//!     .for_each::<Shift>()
//!     .join(
//!         factory.for_each::<Shift>(),
//!         joiner::equal_bi(|(a,): &(Shift,)| a.employee, |b: &Shift| b.employee)
//!             .and(joiner::less_than(|(a,): &(Shift,)| a.start, |b: &Shift| b.start))
//!             .and(joiner::filtering(|(a,): &(Shift,), b: &Shift| a.end > b.start)),
//!     )
//!     .penalize("overlapping shifts", HardSoftScore::ONE_HARD);
//!
//! let mut network = factory.build().unwrap();
//! network.insert(Shift { employee: 1, start: 8, end: 12 });
//! network.insert(Shift { employee: 1, start: 10, end: 14 });
//! assert_eq!(network.calculate_score(), HardSoftScore::of(-1, 0));
//! ```

pub mod logging;

// Score types
pub use solverforge_core::score::{
    HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, Score, SimpleDecimalScore,
    SimpleScore,
};
pub use solverforge_core::{ConstraintRef, Decimal, ImpactType, MatchWeighted, ParseableScore};

// Network construction and evaluation
pub use solverforge_network::{
    collector, joiner, ConstraintFactory, ConstraintNetwork, FactHandle, NetworkError, Stream,
};

// Score analysis
pub use solverforge_network::{
    ConstraintAnalysis, ConstraintJustification, ConstraintWeightOverrides,
    DetailedConstraintMatch, EntityRef, Indictment, IndictmentMap, ScoreExplanation,
};

pub use solverforge_config::{EnvironmentMode, NetworkConfig};

pub mod prelude {
    pub use super::{
        HardMediumSoftScore, HardSoftDecimalScore, HardSoftScore, Score, SimpleDecimalScore,
        SimpleScore,
    };
    pub use super::{collector, joiner, ConstraintFactory, ConstraintNetwork, FactHandle};
    pub use super::{EnvironmentMode, NetworkConfig};
}
