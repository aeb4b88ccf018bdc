//! Node tests, driving each node through its inputs and a recording consumer.

mod flatten;
mod group;
mod join;

use std::collections::HashMap;
use std::fmt::Debug;

use crate::test_utils::Event;
use crate::tuple::TupleId;

/// Applies recorded events to the set of live downstream tuples, checking
/// that every call respects the tuple lifecycle.
fn apply<F: Debug>(alive: &mut HashMap<TupleId, F>, events: Vec<Event<F>>) {
    for event in events {
        match event {
            Event::Insert(id, facts) => {
                assert!(alive.insert(id, facts).is_none(), "{} inserted twice", id);
            }
            Event::Update(id, facts) => {
                assert!(alive.insert(id, facts).is_some(), "{} updated before insert", id);
            }
            Event::Retract(id) => {
                assert!(alive.remove(&id).is_some(), "{} retracted while dead", id);
            }
        }
    }
}

/// Live facts, sorted, for comparison with a brute-force result.
fn sorted<F: Clone + Ord>(alive: &HashMap<TupleId, F>) -> Vec<F> {
    let mut facts: Vec<F> = alive.values().cloned().collect();
    facts.sort();
    facts
}
