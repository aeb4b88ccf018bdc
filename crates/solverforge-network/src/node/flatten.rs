//! Flatten node: one source tuple fans out into many output tuples.
//!
//! Upstream calls only stage the source change; the mapping runs at flush.
//! On a source update the node diffs, per distinct value, the handles it
//! materialized before against the values the mapping produces now: with
//! `o` old and `n` new occurrences of a value it updates `min(o, n)` handles
//! in place, retracts the `o - n` left over or inserts the `n - o` missing.
//!
//! Old occurrences of a value are reused in the order they were recorded and
//! new occurrences are consumed in the order the mapping produced them.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::buffer::{Change, InputBuffer};
use crate::lifecycle::{Downstream, Propagated, TupleLifecycle};
use crate::output::OutputQueue;
use crate::tuple::{Fact, Facts, TupleId};

use super::{NetworkNode, Source, UniInput};

pub struct FlattenNode<F, V, I, O, M, C> {
    mapping: M,
    combine: C,
    input: InputBuffer<F>,
    // Per source tuple: the produced values and their output handles, in order.
    materialized: HashMap<TupleId, Vec<(V, TupleId)>>,
    output: OutputQueue<O>,
    downstream: Downstream<O>,
    _phantom: PhantomData<fn() -> I>,
}

impl<F, V, I, O, M, C> FlattenNode<F, V, I, O, M, C>
where
    F: Facts,
    V: Fact + Eq + Hash,
    I: IntoIterator<Item = V>,
    O: Facts,
    M: Fn(&F) -> I,
    C: Fn(&F, &V) -> O,
{
    pub fn new(mapping: M, combine: C) -> Self {
        Self {
            mapping,
            combine,
            input: InputBuffer::new("flatten"),
            materialized: HashMap::new(),
            output: OutputQueue::new("flatten"),
            downstream: Downstream::default(),
            _phantom: PhantomData,
        }
    }

    fn insert_source(&mut self, id: TupleId, facts: &F) {
        let mut produced = Vec::new();
        for value in (self.mapping)(facts) {
            let out = self.output.insert((self.combine)(facts, &value));
            produced.push((value, out));
        }
        self.materialized.insert(id, produced);
    }

    fn update_source(&mut self, id: TupleId, facts: &F) {
        let previous = self.materialized.remove(&id).unwrap_or_default();

        let mut reusable: HashMap<V, SmallVec<[TupleId; 2]>> = HashMap::new();
        for (value, out) in &previous {
            reusable.entry(value.clone()).or_default().push(*out);
        }
        let mut reused_at: HashMap<V, usize> = HashMap::new();

        let mut produced = Vec::new();
        for value in (self.mapping)(facts) {
            let next = reused_at.entry(value.clone()).or_insert(0);
            let handle = reusable
                .get(&value)
                .and_then(|handles| handles.get(*next))
                .copied();
            let tuple = (self.combine)(facts, &value);
            let out = match handle {
                Some(out) => {
                    *next += 1;
                    self.output.update(out, tuple);
                    out
                }
                None => self.output.insert(tuple),
            };
            produced.push((value, out));
        }

        for (value, out) in previous {
            let used = reused_at.get(&value).copied().unwrap_or(0);
            // Handles past the reused prefix of this value are leftovers.
            let position = reusable
                .get(&value)
                .and_then(|handles| handles.iter().position(|h| *h == out));
            if position.is_some_and(|pos| pos >= used) {
                self.output.retract(out);
            }
        }

        self.materialized.insert(id, produced);
    }

    fn retract_source(&mut self, id: TupleId) {
        if let Some(previous) = self.materialized.remove(&id) {
            for (_, out) in previous {
                self.output.retract(out);
            }
        }
    }

    /// Output handles currently materialized for a source tuple.
    pub fn materialized(&self, id: TupleId) -> Vec<(V, TupleId)> {
        self.materialized.get(&id).cloned().unwrap_or_default()
    }
}

impl<F, V, I, O, M, C> NetworkNode for FlattenNode<F, V, I, O, M, C>
where
    F: Facts,
    V: Fact + Eq + Hash,
    I: IntoIterator<Item = V>,
    O: Facts,
    M: Fn(&F) -> I,
    C: Fn(&F, &V) -> O,
{
    fn name(&self) -> &'static str {
        "flatten"
    }

    fn flush(&mut self) -> Propagated {
        for (id, change) in self.input.drain() {
            match change {
                Change::Insert(facts) => self.insert_source(id, &facts),
                Change::Update(facts) => self.update_source(id, &facts),
                Change::Retract => self.retract_source(id),
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

impl<F: Facts, V, I, O, M, C> UniInput for FlattenNode<F, V, I, O, M, C> {
    type Input = F;

    fn input(&mut self) -> &mut InputBuffer<F> {
        &mut self.input
    }
}

impl<F, V, I, O: Facts, M, C> Source<O> for FlattenNode<F, V, I, O, M, C> {
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<O>>) {
        self.downstream.connect(downstream);
    }
}
