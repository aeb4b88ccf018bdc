//! Test utilities for the network crate.

use std::cell::RefCell;
use std::rc::Rc;

use crate::lifecycle::TupleLifecycle;
use crate::tuple::{Tuple, TupleId};

/// One recorded lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<F> {
    Insert(TupleId, F),
    Update(TupleId, F),
    Retract(TupleId),
}

/// A consumer that records every call it receives.
///
/// Clones share the same log, so a test keeps one clone while the node
/// under test owns the other.
#[derive(Debug)]
pub struct RecordingLifecycle<F> {
    events: Rc<RefCell<Vec<Event<F>>>>,
}

impl<F> Clone for RecordingLifecycle<F> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
        }
    }
}

impl<F: Clone> RecordingLifecycle<F> {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<Event<F>> {
        self.events.borrow().clone()
    }

    /// Returns and clears the log.
    pub fn take(&self) -> Vec<Event<F>> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl<F: Clone> TupleLifecycle<F> for RecordingLifecycle<F> {
    fn insert(&mut self, tuple: &Tuple<F>) {
        self.events
            .borrow_mut()
            .push(Event::Insert(tuple.id(), tuple.facts().clone()));
    }

    fn update(&mut self, tuple: &Tuple<F>) {
        self.events
            .borrow_mut()
            .push(Event::Update(tuple.id(), tuple.facts().clone()));
    }

    fn retract(&mut self, tuple: &Tuple<F>) {
        self.events.borrow_mut().push(Event::Retract(tuple.id()));
    }
}

/// Shorthand for a uni tuple.
pub fn uni<A>(id: u64, a: A) -> Tuple<(A,)> {
    Tuple::new(TupleId::new(id), (a,))
}
