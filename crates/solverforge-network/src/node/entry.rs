//! Entry node: where facts of one class enter the network.

use crate::buffer::{Change, InputBuffer};
use crate::lifecycle::{Downstream, Propagated, TupleLifecycle};
use crate::output::OutputQueue;
use crate::tuple::{Fact, Tuple, TupleId};

use super::{NetworkNode, Source};

/// Uni tuples of class `A`, keyed by the fact handles the network issues.
pub struct EntryNode<A> {
    input: InputBuffer<(A,)>,
    output: OutputQueue<(A,)>,
    downstream: Downstream<(A,)>,
}

impl<A: Fact> EntryNode<A> {
    pub fn new() -> Self {
        Self {
            input: InputBuffer::new("entry"),
            output: OutputQueue::new("entry"),
            downstream: Downstream::default(),
        }
    }

    pub fn stage_insert(&mut self, id: TupleId, fact: A) {
        self.input.stage_insert(&Tuple::new(id, (fact,)));
    }

    pub fn stage_update(&mut self, id: TupleId, fact: A) {
        self.input.stage_update(&Tuple::new(id, (fact,)));
    }

    pub fn stage_retract(&mut self, id: TupleId) {
        self.input.stage_retract(id);
    }

    pub fn live_len(&self) -> usize {
        self.input.live_len()
    }
}

impl<A: Fact> Default for EntryNode<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Fact> NetworkNode for EntryNode<A> {
    fn name(&self) -> &'static str {
        "entry"
    }

    fn flush(&mut self) -> Propagated {
        for (id, change) in self.input.drain() {
            match change {
                Change::Insert(facts) => self.output.insert_with_id(id, facts),
                Change::Update(facts) => self.output.update(id, facts),
                Change::Retract => self.output.retract(id),
            }
        }
        self.output.propagate(&mut self.downstream)
    }

    fn is_settled(&self) -> bool {
        self.input.is_empty() && self.output.is_settled()
    }

    fn is_connected(&self) -> bool {
        self.downstream.is_connected()
    }
}

impl<A: Fact> Source<(A,)> for EntryNode<A> {
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<(A,)>>) {
        self.downstream.connect(downstream);
    }
}
