//! Group-by node.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;

use crate::buffer::{Change, InputBuffer};
use crate::collector::{Accumulator, Collector};
use crate::lifecycle::{Downstream, Propagated, TupleLifecycle};
use crate::output::OutputQueue;
use crate::tuple::{Fact, Facts, TupleId};

use super::{NetworkNode, Source, UniInput};

struct Group<A, R> {
    accumulator: A,
    size: usize,
    out: Option<TupleId>,
    last: Option<R>,
}

/// Folds source tuples into one output tuple per group key.
///
/// A group emits insert when it gains its first tuple, update when its
/// collected result changes, and retract when it loses its last tuple.
pub struct GroupNode<F, K, C, O, KF, B>
where
    C: Collector<F>,
{
    key_fn: KF,
    collector: C,
    build: B,
    input: InputBuffer<F>,
    sources: HashMap<TupleId, (K, C::Value)>,
    groups: HashMap<K, Group<C::Accumulator, C::Result>>,
    affected: Vec<K>,
    marked: HashSet<K>,
    output: OutputQueue<O>,
    downstream: Downstream<O>,
    _phantom: PhantomData<fn(&F)>,
}

impl<F, K, C, O, KF, B> GroupNode<F, K, C, O, KF, B>
where
    F: Facts,
    K: Fact + Eq + Hash,
    C: Collector<F>,
    O: Facts,
    KF: Fn(&F) -> K,
    B: Fn(&K, &C::Result) -> O,
{
    pub fn new(key_fn: KF, collector: C, build: B) -> Self {
        Self {
            key_fn,
            collector,
            build,
            input: InputBuffer::new("group_by"),
            sources: HashMap::new(),
            groups: HashMap::new(),
            affected: Vec::new(),
            marked: HashSet::new(),
            output: OutputQueue::new("group_by"),
            downstream: Downstream::default(),
            _phantom: PhantomData,
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn mark(&mut self, key: &K) {
        if self.marked.insert(key.clone()) {
            self.affected.push(key.clone());
        }
    }

    fn add(&mut self, id: TupleId, facts: &F) {
        let key = (self.key_fn)(facts);
        let value = self.collector.extract(facts);
        let collector = &self.collector;
        let group = self.groups.entry(key.clone()).or_insert_with(|| Group {
            accumulator: collector.create_accumulator(),
            size: 0,
            out: None,
            last: None,
        });
        group.accumulator.accumulate(&value);
        group.size += 1;
        self.mark(&key);
        self.sources.insert(id, (key, value));
    }

    fn remove(&mut self, id: TupleId) {
        let Some((key, value)) = self.sources.remove(&id) else {
            return;
        };
        if let Some(group) = self.groups.get_mut(&key) {
            group.accumulator.retract(&value);
            group.size -= 1;
        }
        self.mark(&key);
    }

    fn emit(&mut self, key: K) {
        let Some(group) = self.groups.get_mut(&key) else {
            return;
        };
        if group.size == 0 {
            if let Some(out) = group.out {
                self.output.retract(out);
            }
            self.groups.remove(&key);
            return;
        }
        let result = group.accumulator.finish();
        match group.out {
            None => {
                group.out = Some(self.output.insert((self.build)(&key, &result)));
                group.last = Some(result);
            }
            Some(out) => {
                if group.last.as_ref() != Some(&result) {
                    self.output.update(out, (self.build)(&key, &result));
                    group.last = Some(result);
                }
            }
        }
    }
}

impl<F, K, C, O, KF, B> NetworkNode for GroupNode<F, K, C, O, KF, B>
where
    F: Facts,
    K: Fact + Eq + Hash,
    C: Collector<F>,
    O: Facts,
    KF: Fn(&F) -> K,
    B: Fn(&K, &C::Result) -> O,
{
    fn name(&self) -> &'static str {
        "group_by"
    }

    fn flush(&mut self) -> Propagated {
        for (id, change) in self.input.drain() {
            match change {
                Change::Insert(facts) => self.add(id, &facts),
                Change::Update(facts) => {
                    self.remove(id);
                    self.add(id, &facts);
                }
                Change::Retract => self.remove(id),
            }
        }
        self.marked.clear();
        for key in std::mem::take(&mut self.affected) {
            self.emit(key);
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

impl<F, K, C, O, KF, B> UniInput for GroupNode<F, K, C, O, KF, B>
where
    F: Facts,
    C: Collector<F>,
{
    type Input = F;

    fn input(&mut self) -> &mut InputBuffer<F> {
        &mut self.input
    }
}

impl<F, K, C, O, KF, B> Source<O> for GroupNode<F, K, C, O, KF, B>
where
    C: Collector<F>,
    O: Facts,
{
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<O>>) {
        self.downstream.connect(downstream);
    }
}

/// Collector of `group_by_key`: the key alone is the result.
pub struct KeyCollector<F> {
    _phantom: PhantomData<fn(&F)>,
}

impl<F> KeyCollector<F> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<F> Default for KeyCollector<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: 'static> Collector<F> for KeyCollector<F> {
    type Value = ();
    type Result = ();
    type Accumulator = KeyAccumulator;

    fn extract(&self, _facts: &F) {}

    fn create_accumulator(&self) -> KeyAccumulator {
        KeyAccumulator
    }
}

pub struct KeyAccumulator;

impl Accumulator<(), ()> for KeyAccumulator {
    fn accumulate(&mut self, _: &()) {}

    fn retract(&mut self, _: &()) {}

    fn finish(&self) {}

    fn reset(&mut self) {}
}
