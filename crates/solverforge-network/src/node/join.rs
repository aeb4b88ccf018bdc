//! Join node: pairs a left group of arity N with a right fact.
//!
//! Both sides are indexed on their joiner keys. A change on one side probes
//! the other side's index, tests the joiner filters on each candidate and
//! creates, updates or retracts one output tuple per matching pair. Staged
//! left changes are applied before staged right changes.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::buffer::{Change, InputBuffer};
use crate::index::Index;
use crate::joiner::{IndexKey, Joiner};
use crate::lifecycle::{Downstream, Propagated, TupleLifecycle};
use crate::output::OutputQueue;
use crate::tuple::{Append, Fact, TupleId};

use super::{BiInput, NetworkNode, Source};

struct LeftEntry<L> {
    facts: L,
    keys: Vec<IndexKey>,
    // right id -> output id
    outputs: BTreeMap<TupleId, TupleId>,
}

struct RightEntry<R> {
    fact: R,
    keys: Vec<IndexKey>,
    lefts: BTreeSet<TupleId>,
}

pub struct JoinNode<L, R>
where
    L: Append<R>,
    R: Fact,
{
    joiner: Joiner<L, R>,
    left_input: InputBuffer<L>,
    right_input: InputBuffer<(R,)>,
    left_index: Index,
    right_index: Index,
    lefts: HashMap<TupleId, LeftEntry<L>>,
    rights: HashMap<TupleId, RightEntry<R>>,
    output: OutputQueue<L::Output>,
    downstream: Downstream<L::Output>,
}

impl<L, R> JoinNode<L, R>
where
    L: Append<R>,
    R: Fact,
{
    pub fn new(joiner: Joiner<L, R>) -> Self {
        let comparisons = joiner.comparisons();
        Self {
            left_index: Index::for_left(&comparisons),
            right_index: Index::for_right(&comparisons),
            joiner,
            left_input: InputBuffer::new("join"),
            right_input: InputBuffer::new("join"),
            lefts: HashMap::new(),
            rights: HashMap::new(),
            output: OutputQueue::new("join"),
            downstream: Downstream::default(),
        }
    }

    // Right ids matching `facts` under `keys`, filters included, in id order.
    fn right_matches(&self, facts: &L, keys: &[IndexKey]) -> Vec<TupleId> {
        let mut found = Vec::new();
        self.right_index.visit(keys, |rid| {
            if let Some(right) = self.rights.get(&rid) {
                if self.joiner.test_filters(facts, &right.fact) {
                    found.push(rid);
                }
            }
        });
        found
    }

    fn left_matches(&self, fact: &R, keys: &[IndexKey]) -> Vec<TupleId> {
        let mut found = Vec::new();
        self.left_index.visit(keys, |lid| {
            if let Some(left) = self.lefts.get(&lid) {
                if self.joiner.test_filters(&left.facts, fact) {
                    found.push(lid);
                }
            }
        });
        found
    }

    fn insert_left(&mut self, id: TupleId, facts: L) {
        let keys = self.joiner.left_keys(&facts);
        self.left_index.put(&keys, id);
        let mut outputs = BTreeMap::new();
        for rid in self.right_matches(&facts, &keys) {
            if let Some(right) = self.rights.get_mut(&rid) {
                let out = self.output.insert(facts.append(&right.fact));
                right.lefts.insert(id);
                outputs.insert(rid, out);
            }
        }
        self.lefts.insert(
            id,
            LeftEntry {
                facts,
                keys,
                outputs,
            },
        );
    }

    fn update_left(&mut self, id: TupleId, facts: L) {
        let Some(mut entry) = self.lefts.remove(&id) else {
            return;
        };
        let keys = self.joiner.left_keys(&facts);
        if keys != entry.keys {
            self.left_index.remove(&entry.keys, id);
            self.left_index.put(&keys, id);
        }
        let matched: BTreeSet<TupleId> = self.right_matches(&facts, &keys).into_iter().collect();

        let mut outputs = BTreeMap::new();
        for (rid, out) in std::mem::take(&mut entry.outputs) {
            let Some(right) = self.rights.get_mut(&rid) else {
                continue;
            };
            if matched.contains(&rid) {
                self.output.update(out, facts.append(&right.fact));
                outputs.insert(rid, out);
            } else {
                self.output.retract(out);
                right.lefts.remove(&id);
            }
        }
        for rid in matched {
            if outputs.contains_key(&rid) {
                continue;
            }
            if let Some(right) = self.rights.get_mut(&rid) {
                let out = self.output.insert(facts.append(&right.fact));
                right.lefts.insert(id);
                outputs.insert(rid, out);
            }
        }

        entry.facts = facts;
        entry.keys = keys;
        entry.outputs = outputs;
        self.lefts.insert(id, entry);
    }

    fn retract_left(&mut self, id: TupleId) {
        let Some(entry) = self.lefts.remove(&id) else {
            return;
        };
        self.left_index.remove(&entry.keys, id);
        for (rid, out) in entry.outputs {
            self.output.retract(out);
            if let Some(right) = self.rights.get_mut(&rid) {
                right.lefts.remove(&id);
            }
        }
    }

    fn insert_right(&mut self, id: TupleId, fact: R) {
        let keys = self.joiner.right_keys(&fact);
        self.right_index.put(&keys, id);
        let mut lefts = BTreeSet::new();
        for lid in self.left_matches(&fact, &keys) {
            if let Some(left) = self.lefts.get_mut(&lid) {
                let out = self.output.insert(left.facts.append(&fact));
                left.outputs.insert(id, out);
                lefts.insert(lid);
            }
        }
        self.rights.insert(id, RightEntry { fact, keys, lefts });
    }

    fn update_right(&mut self, id: TupleId, fact: R) {
        let Some(mut entry) = self.rights.remove(&id) else {
            return;
        };
        let keys = self.joiner.right_keys(&fact);
        if keys != entry.keys {
            self.right_index.remove(&entry.keys, id);
            self.right_index.put(&keys, id);
        }
        let matched: BTreeSet<TupleId> = self.left_matches(&fact, &keys).into_iter().collect();

        let mut lefts = BTreeSet::new();
        for lid in std::mem::take(&mut entry.lefts) {
            let Some(left) = self.lefts.get_mut(&lid) else {
                continue;
            };
            let Some(&out) = left.outputs.get(&id) else {
                continue;
            };
            if matched.contains(&lid) {
                self.output.update(out, left.facts.append(&fact));
                lefts.insert(lid);
            } else {
                self.output.retract(out);
                left.outputs.remove(&id);
            }
        }
        for lid in matched {
            if lefts.contains(&lid) {
                continue;
            }
            if let Some(left) = self.lefts.get_mut(&lid) {
                let out = self.output.insert(left.facts.append(&fact));
                left.outputs.insert(id, out);
                lefts.insert(lid);
            }
        }

        entry.fact = fact;
        entry.keys = keys;
        entry.lefts = lefts;
        self.rights.insert(id, entry);
    }

    fn retract_right(&mut self, id: TupleId) {
        let Some(entry) = self.rights.remove(&id) else {
            return;
        };
        self.right_index.remove(&entry.keys, id);
        for lid in entry.lefts {
            if let Some(left) = self.lefts.get_mut(&lid) {
                if let Some(out) = left.outputs.remove(&id) {
                    self.output.retract(out);
                }
            }
        }
    }

    /// Number of matched pairs currently alive.
    pub fn match_count(&self) -> usize {
        self.lefts.values().map(|left| left.outputs.len()).sum()
    }
}

impl<L, R> NetworkNode for JoinNode<L, R>
where
    L: Append<R>,
    R: Fact,
{
    fn name(&self) -> &'static str {
        "join"
    }

    fn flush(&mut self) -> Propagated {
        for (id, change) in self.left_input.drain() {
            match change {
                Change::Insert(facts) => self.insert_left(id, facts),
                Change::Update(facts) => self.update_left(id, facts),
                Change::Retract => self.retract_left(id),
            }
        }
        for (id, change) in self.right_input.drain() {
            match change {
                Change::Insert((fact,)) => self.insert_right(id, fact),
                Change::Update((fact,)) => self.update_right(id, fact),
                Change::Retract => self.retract_right(id),
            }
        }
        self.output.propagate(&mut self.downstream)
    }

    fn is_settled(&self) -> bool {
        self.left_input.is_empty() && self.right_input.is_empty() && self.output.is_settled()
    }

    fn is_connected(&self) -> bool {
        self.downstream.is_connected()
    }
}

impl<L, R> BiInput for JoinNode<L, R>
where
    L: Append<R>,
    R: Fact,
{
    type Left = L;
    type Right = (R,);

    fn left_input(&mut self) -> &mut InputBuffer<L> {
        &mut self.left_input
    }

    fn right_input(&mut self) -> &mut InputBuffer<(R,)> {
        &mut self.right_input
    }
}

impl<L, R> Source<L::Output> for JoinNode<L, R>
where
    L: Append<R>,
    R: Fact,
{
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<L::Output>>) {
        self.downstream.connect(downstream);
    }
}
