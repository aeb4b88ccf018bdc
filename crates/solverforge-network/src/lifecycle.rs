//! The insert/update/retract contract shared by every node input and terminal.

use std::cell::RefCell;
use std::fmt;
use std::ops::AddAssign;
use std::rc::Rc;

use crate::tuple::Tuple;

/// Receiver of tuple lifecycle events.
///
/// For every tuple id the calls arrive as one `insert`, any number of
/// `update`s, then at most one `retract`.
pub trait TupleLifecycle<F> {
    fn insert(&mut self, tuple: &Tuple<F>);

    fn update(&mut self, tuple: &Tuple<F>);

    fn retract(&mut self, tuple: &Tuple<F>);
}

// Terminals stay shared with the network that queries them.
impl<F, T: TupleLifecycle<F>> TupleLifecycle<F> for Rc<RefCell<T>> {
    fn insert(&mut self, tuple: &Tuple<F>) {
        self.borrow_mut().insert(tuple);
    }

    fn update(&mut self, tuple: &Tuple<F>) {
        self.borrow_mut().update(tuple);
    }

    fn retract(&mut self, tuple: &Tuple<F>) {
        self.borrow_mut().retract(tuple);
    }
}

/// The single consumer a node propagates to.
pub struct Downstream<F> {
    consumer: Option<Box<dyn TupleLifecycle<F>>>,
}

impl<F> Default for Downstream<F> {
    fn default() -> Self {
        Self { consumer: None }
    }
}

impl<F> Downstream<F> {
    /// Attaches the consumer.
    ///
    /// # Panics
    ///
    /// Panics if a consumer is already attached.
    pub fn connect(&mut self, consumer: Box<dyn TupleLifecycle<F>>) {
        assert!(
            self.consumer.is_none(),
            "node output already has a downstream consumer"
        );
        self.consumer = Some(consumer);
    }

    pub fn is_connected(&self) -> bool {
        self.consumer.is_some()
    }

    #[inline]
    pub fn insert(&mut self, tuple: &Tuple<F>) {
        if let Some(consumer) = self.consumer.as_mut() {
            consumer.insert(tuple);
        }
    }

    #[inline]
    pub fn update(&mut self, tuple: &Tuple<F>) {
        if let Some(consumer) = self.consumer.as_mut() {
            consumer.update(tuple);
        }
    }

    #[inline]
    pub fn retract(&mut self, tuple: &Tuple<F>) {
        if let Some(consumer) = self.consumer.as_mut() {
            consumer.retract(tuple);
        }
    }
}

impl<F> fmt::Debug for Downstream<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downstream")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Counts of the calls one flush sent downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagated {
    pub inserts: usize,
    pub updates: usize,
    pub retracts: usize,
}

impl Propagated {
    pub fn total(&self) -> usize {
        self.inserts + self.updates + self.retracts
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for Propagated {
    fn add_assign(&mut self, other: Self) {
        self.inserts += other.inserts;
        self.updates += other.updates;
        self.retracts += other.retracts;
    }
}
