//! Seeded random change histories.
//!
//! A history walks a fixed number of slots. Each step inserts into an empty
//! slot, or updates or retracts a filled one, and now and then asks for a
//! flush. The same seed always yields the same history.
//!
//! # Example
//!
//! ```
//! use solverforge_test::history::{Change, ChangeHistory};
//! use rand::Rng;
//!
//! let mut history = ChangeHistory::new(42, 4);
//! let changes = history.generate(50, |rng| rng.random_range(0..10));
//! assert_eq!(changes.len(), 50);
//! assert!(matches!(changes[0], Change::Insert { .. } | Change::Flush));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a history.
#[derive(Clone, Debug, PartialEq)]
pub enum Change<T> {
    Insert { slot: usize, fact: T },
    Update { slot: usize, fact: T },
    Retract { slot: usize },
    Flush,
}

#[derive(Debug)]
pub struct ChangeHistory {
    rng: ChaCha8Rng,
    filled: Vec<bool>,
    flush_probability: f64,
    retract_probability: f64,
}

impl ChangeHistory {
    pub fn new(seed: u64, slots: usize) -> Self {
        assert!(slots > 0, "a change history needs at least one slot");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            filled: vec![false; slots],
            flush_probability: 0.2,
            retract_probability: 0.25,
        }
    }

    pub fn with_flush_probability(mut self, probability: f64) -> Self {
        self.flush_probability = probability;
        self
    }

    pub fn with_retract_probability(mut self, probability: f64) -> Self {
        self.retract_probability = probability;
        self
    }

    /// The generator, for drawing fact contents.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Slots currently holding a fact.
    pub fn filled_slots(&self) -> Vec<usize> {
        (0..self.filled.len()).filter(|&slot| self.filled[slot]).collect()
    }

    /// Draws the next change; `make` draws the content of inserted or
    /// updated facts.
    pub fn next_change<T>(&mut self, mut make: impl FnMut(&mut ChaCha8Rng) -> T) -> Change<T> {
        if self.rng.random_bool(self.flush_probability) {
            return Change::Flush;
        }
        let slot = self.rng.random_range(0..self.filled.len());
        if !self.filled[slot] {
            self.filled[slot] = true;
            return Change::Insert {
                slot,
                fact: make(&mut self.rng),
            };
        }
        if self.rng.random_bool(self.retract_probability) {
            self.filled[slot] = false;
            return Change::Retract { slot };
        }
        Change::Update {
            slot,
            fact: make(&mut self.rng),
        }
    }

    pub fn generate<T>(
        &mut self,
        steps: usize,
        mut make: impl FnMut(&mut ChaCha8Rng) -> T,
    ) -> Vec<Change<T>> {
        (0..steps).map(|_| self.next_change(&mut make)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_history() {
        let a = ChangeHistory::new(9, 5).generate(100, |rng| rng.random_range(0..100));
        let b = ChangeHistory::new(9, 5).generate(100, |rng| rng.random_range(0..100));
        assert_eq!(a, b);
    }

    #[test]
    fn test_changes_respect_slot_lifecycle() {
        let mut history = ChangeHistory::new(3, 3);
        let mut filled = [false; 3];
        for change in history.generate(500, |rng| rng.random_range(0..4)) {
            match change {
                Change::Insert { slot, .. } => {
                    assert!(!filled[slot]);
                    filled[slot] = true;
                }
                Change::Update { slot, .. } => assert!(filled[slot]),
                Change::Retract { slot } => {
                    assert!(filled[slot]);
                    filled[slot] = false;
                }
                Change::Flush => {}
            }
        }
        let expected: Vec<usize> = (0..3).filter(|&s| filled[s]).collect();
        assert_eq!(history.filled_slots(), expected);
    }

    #[test]
    fn test_never_flushing() {
        let mut history = ChangeHistory::new(1, 2).with_flush_probability(0.0);
        let changes = history.generate(20, |_| ());
        assert!(changes.iter().all(|c| !matches!(c, Change::Flush)));
    }
}
