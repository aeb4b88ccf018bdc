//! Fluent constraint stream API.
//!
//! Streams are built from a [`ConstraintFactory`] and every operation adds a
//! node to the network the factory eventually builds:
//!
//! ```text
//! ConstraintFactory::new()
//!     .for_each::<A>()                 -> Stream<(A,)>
//!     .join(other, joiner)             -> Stream<(A, B)>
//!     .filter(predicate)               -> Stream<(A, B)>
//!     .penalize(name, weight)          -> terminal
//! ```
//!
//! # Example
//!
//! ```
//! use solverforge_core::SimpleScore;
//! use solverforge_network::joiner::equal_bi;
//! use solverforge_network::ConstraintFactory;
//!
//! #[derive(Clone, Debug)]
//! struct Shift { id: u32, employee: u32 }
//!
//! #[derive(Clone, Debug)]
//! struct Unavailable { employee: u32 }
//!
//! let factory = ConstraintFactory::<SimpleScore>::new();
//! factory
//!     .for_each::<Shift>()
//!     .join(
//!         factory.for_each::<Unavailable>(),
//!         equal_bi(|(s,): &(Shift,)| s.employee, |u: &Unavailable| u.employee),
//!     )
//!     .penalize("unavailable employee", SimpleScore::of(10));
//!
//! let mut network = factory.build().unwrap();
//! network.insert(Shift { id: 1, employee: 7 });
//! network.insert(Shift { id: 2, employee: 8 });
//! let away = network.insert(Unavailable { employee: 7 });
//! assert_eq!(network.calculate_score(), SimpleScore::of(-10));
//!
//! network.retract::<Unavailable>(away);
//! assert_eq!(network.calculate_score(), SimpleScore::of(0));
//! ```

mod constraint_stream;
mod factory;

pub use constraint_stream::Stream;
pub use factory::ConstraintFactory;

