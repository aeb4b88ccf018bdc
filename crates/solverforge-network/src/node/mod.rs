//! Propagation nodes of the constraint network.
//!
//! Every node owns the staged buffers of its inputs and an [`OutputQueue`]
//! of the tuples it emits. Upstream calls only stage; the network calls
//! [`NetworkNode::flush`] once per node, in ascending layer order, and the
//! node then applies its staged changes and propagates its consolidated
//! output to its single downstream consumer.
//!
//! [`OutputQueue`]: crate::output::OutputQueue

mod entry;
mod exists;
mod filter;
mod flatten;
mod group;
mod join;
mod map;
mod scorer;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::rc::Rc;

pub use entry::EntryNode;
pub use exists::ExistsNode;
pub use filter::FilterNode;
pub use flatten::FlattenNode;
pub use group::{GroupNode, KeyCollector};
pub use join::JoinNode;
pub use map::MapNode;
pub use scorer::{ConstraintScorer, MatchImpact, ScorerNode};

use crate::buffer::InputBuffer;
use crate::lifecycle::{Propagated, TupleLifecycle};
use crate::tuple::Tuple;

/// A node the network flushes.
pub trait NetworkNode {
    fn name(&self) -> &'static str;

    /// Applies every staged change and propagates the result downstream.
    fn flush(&mut self) -> Propagated;

    /// True when nothing is staged and nothing awaits propagation.
    fn is_settled(&self) -> bool;

    fn is_connected(&self) -> bool;
}

/// A node output a stream attaches its consumer to.
pub trait Source<F> {
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<F>>);
}

/// A node with one staged input.
pub trait UniInput {
    type Input;

    fn input(&mut self) -> &mut InputBuffer<Self::Input>;
}

/// A node with a left input and a right input.
pub trait BiInput {
    type Left;
    type Right;

    fn left_input(&mut self) -> &mut InputBuffer<Self::Left>;

    fn right_input(&mut self) -> &mut InputBuffer<Self::Right>;
}

/// Upstream-facing handle staging into a single-input node.
pub struct NodeInput<N>(Rc<RefCell<N>>);

impl<N> NodeInput<N> {
    pub fn new(node: Rc<RefCell<N>>) -> Self {
        Self(node)
    }
}

impl<N> TupleLifecycle<N::Input> for NodeInput<N>
where
    N: UniInput,
    N::Input: Clone,
{
    fn insert(&mut self, tuple: &Tuple<N::Input>) {
        self.0.borrow_mut().input().stage_insert(tuple);
    }

    fn update(&mut self, tuple: &Tuple<N::Input>) {
        self.0.borrow_mut().input().stage_update(tuple);
    }

    fn retract(&mut self, tuple: &Tuple<N::Input>) {
        self.0.borrow_mut().input().stage_retract(tuple.id());
    }
}

/// Upstream-facing handle staging into the left input of a two-input node.
pub struct LeftInput<N>(Rc<RefCell<N>>);

impl<N> LeftInput<N> {
    pub fn new(node: Rc<RefCell<N>>) -> Self {
        Self(node)
    }
}

impl<N> TupleLifecycle<N::Left> for LeftInput<N>
where
    N: BiInput,
    N::Left: Clone,
{
    fn insert(&mut self, tuple: &Tuple<N::Left>) {
        self.0.borrow_mut().left_input().stage_insert(tuple);
    }

    fn update(&mut self, tuple: &Tuple<N::Left>) {
        self.0.borrow_mut().left_input().stage_update(tuple);
    }

    fn retract(&mut self, tuple: &Tuple<N::Left>) {
        self.0.borrow_mut().left_input().stage_retract(tuple.id());
    }
}

/// Upstream-facing handle staging into the right input of a two-input node.
pub struct RightInput<N>(Rc<RefCell<N>>);

impl<N> RightInput<N> {
    pub fn new(node: Rc<RefCell<N>>) -> Self {
        Self(node)
    }
}

impl<N> TupleLifecycle<N::Right> for RightInput<N>
where
    N: BiInput,
    N::Right: Clone,
{
    fn insert(&mut self, tuple: &Tuple<N::Right>) {
        self.0.borrow_mut().right_input().stage_insert(tuple);
    }

    fn update(&mut self, tuple: &Tuple<N::Right>) {
        self.0.borrow_mut().right_input().stage_update(tuple);
    }

    fn retract(&mut self, tuple: &Tuple<N::Right>) {
        self.0.borrow_mut().right_input().stage_retract(tuple.id());
    }
}
