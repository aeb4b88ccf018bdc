//! Incremental constraint-evaluation network for SolverForge.
//!
//! This crate provides the node network behind incremental scoring:
//! - Tuples of arity 1 to 5 and the insert/update/retract lifecycle
//! - Joiners and the per-level indexes join nodes probe
//! - Join, filter, map, flatten, group-by and existence nodes
//! - Terminals accumulating one constraint's score each
//! - A network flushing staged fact changes layer by layer
//!
//! # Architecture
//!
//! Fact changes are only staged when they arrive. [`ConstraintNetwork::flush`]
//! visits every node once in ascending layer order; each node applies its
//! staged changes and propagates consolidated output to its one consumer,
//! which stages again. Closures are stored as generic type parameters of
//! the nodes.

// Node types carry their closures as generic parameters
#![allow(clippy::type_complexity)]

pub mod api;
pub mod buffer;
pub mod collector;
pub mod error;
pub mod index;
pub mod joiner;
pub mod lifecycle;
pub mod network;
pub mod node;
pub mod output;
pub mod stream;
pub mod tuple;

#[cfg(test)]
pub(crate) mod test_utils;

// ============================================================================
// Building and running networks
// ============================================================================

pub use error::NetworkError;
pub use network::{ConstraintNetwork, FactHandle};
pub use stream::{ConstraintFactory, Stream};

// ============================================================================
// Joiners
// ============================================================================

pub use joiner::{IndexKey, Joiner, JoinerComparison, JoinerLevel};

// ============================================================================
// Tuples and lifecycle
// ============================================================================

pub use lifecycle::{Propagated, TupleLifecycle};
pub use tuple::{Append, Fact, Facts, ReplaceLast, Tuple, TupleId};

// ============================================================================
// Analysis (for score explanation)
// ============================================================================

pub use api::{
    ConstraintAnalysis, ConstraintJustification, ConstraintWeightOverrides,
    DetailedConstraintMatch, EntityRef, Indictment, IndictmentMap, ScoreExplanation,
};
