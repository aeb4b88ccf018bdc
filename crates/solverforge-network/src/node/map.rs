//! Map node: one output tuple per input tuple.

use crate::buffer::{Change, InputBuffer};
use crate::lifecycle::{Downstream, Propagated, TupleLifecycle};
use crate::output::OutputQueue;
use crate::tuple::{Fact, Facts};

use super::{NetworkNode, Source, UniInput};

/// Projects each tuple to a uni tuple `(U,)` that reuses the input id.
pub struct MapNode<F, U, M> {
    mapping: M,
    input: InputBuffer<F>,
    output: OutputQueue<(U,)>,
    downstream: Downstream<(U,)>,
}

impl<F, U, M> MapNode<F, U, M>
where
    F: Facts,
    U: Fact,
    M: Fn(&F) -> U,
{
    pub fn new(mapping: M) -> Self {
        Self {
            mapping,
            input: InputBuffer::new("map"),
            output: OutputQueue::new("map"),
            downstream: Downstream::default(),
        }
    }
}

impl<F, U, M> NetworkNode for MapNode<F, U, M>
where
    F: Facts,
    U: Fact,
    M: Fn(&F) -> U,
{
    fn name(&self) -> &'static str {
        "map"
    }

    fn flush(&mut self) -> Propagated {
        for (id, change) in self.input.drain() {
            match change {
                Change::Insert(facts) => {
                    let mapped = (self.mapping)(&facts);
                    self.output.insert_with_id(id, (mapped,));
                }
                Change::Update(facts) => {
                    let mapped = (self.mapping)(&facts);
                    self.output.update(id, (mapped,));
                }
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

impl<F: Facts, U, M> UniInput for MapNode<F, U, M> {
    type Input = F;

    fn input(&mut self) -> &mut InputBuffer<F> {
        &mut self.input
    }
}

impl<F, U: Fact, M> Source<(U,)> for MapNode<F, U, M> {
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<(U,)>>) {
        self.downstream.connect(downstream);
    }
}
