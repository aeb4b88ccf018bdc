//! Shared test fixtures for SolverForge crates.
//!
//! This crate provides plain fact types and seeded change histories.
//! It does NOT depend on `solverforge-network` to avoid circular dependencies.
//!
//! - [`schedule`] - Shift and employee facts
//! - [`timetable`] - Lesson facts
//! - [`history`] - Seeded random insert/update/retract sequences
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! solverforge-test = { workspace = true }
//! ```

pub mod history;
pub mod schedule;
pub mod timetable;

pub use history::{Change, ChangeHistory};
pub use schedule::{Employee, Shift};
pub use timetable::Lesson;
