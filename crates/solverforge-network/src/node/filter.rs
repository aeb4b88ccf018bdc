//! Filter node.

use crate::buffer::{Change, InputBuffer};
use crate::lifecycle::{Downstream, Propagated, TupleLifecycle};
use crate::output::OutputQueue;
use crate::tuple::Facts;

use super::{NetworkNode, Source, UniInput};

/// Forwards a tuple, under its own id, while the predicate holds.
///
/// An update re-tests the predicate: still passing emits update, newly
/// passing emits insert, no longer passing emits retract.
pub struct FilterNode<F, P> {
    predicate: P,
    input: InputBuffer<F>,
    output: OutputQueue<F>,
    downstream: Downstream<F>,
}

impl<F, P> FilterNode<F, P>
where
    F: Facts,
    P: Fn(&F) -> bool,
{
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            input: InputBuffer::new("filter"),
            output: OutputQueue::new("filter"),
            downstream: Downstream::default(),
        }
    }
}

impl<F, P> NetworkNode for FilterNode<F, P>
where
    F: Facts,
    P: Fn(&F) -> bool,
{
    fn name(&self) -> &'static str {
        "filter"
    }

    fn flush(&mut self) -> Propagated {
        for (id, change) in self.input.drain() {
            match change {
                Change::Insert(facts) => {
                    if (self.predicate)(&facts) {
                        self.output.insert_with_id(id, facts);
                    }
                }
                Change::Update(facts) => {
                    let passed = self.output.is_alive(id);
                    match (passed, (self.predicate)(&facts)) {
                        (true, true) => self.output.update(id, facts),
                        (true, false) => self.output.retract(id),
                        (false, true) => self.output.insert_with_id(id, facts),
                        (false, false) => {}
                    }
                }
                Change::Retract => {
                    if self.output.is_alive(id) {
                        self.output.retract(id);
                    }
                }
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

impl<F: Facts, P> UniInput for FilterNode<F, P> {
    type Input = F;

    fn input(&mut self) -> &mut InputBuffer<F> {
        &mut self.input
    }
}

impl<F: Facts, P> Source<F> for FilterNode<F, P> {
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<F>>) {
        self.downstream.connect(downstream);
    }
}
