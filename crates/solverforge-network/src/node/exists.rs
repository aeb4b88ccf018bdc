//! Existence node: forwards left tuples by whether a matching right fact exists.

use std::collections::{BTreeSet, HashMap};

use crate::buffer::{Change, InputBuffer};
use crate::index::Index;
use crate::joiner::{IndexKey, Joiner};
use crate::lifecycle::{Downstream, Propagated, TupleLifecycle};
use crate::output::OutputQueue;
use crate::tuple::{Fact, Facts, TupleId};

use super::{BiInput, NetworkNode, Source};

struct LeftEntry<L> {
    facts: L,
    keys: Vec<IndexKey>,
    matches: BTreeSet<TupleId>,
}

struct RightEntry<R> {
    fact: R,
    keys: Vec<IndexKey>,
    lefts: BTreeSet<TupleId>,
}

/// Propagates a left tuple, under its own id, while at least one right fact
/// matches it (`if_exists`) or while none does (`if_not_exists`).
///
/// Right changes only reach the output when a left tuple's match count
/// crosses zero.
pub struct ExistsNode<L, R> {
    joiner: Joiner<L, R>,
    should_exist: bool,
    left_input: InputBuffer<L>,
    right_input: InputBuffer<(R,)>,
    left_index: Index,
    right_index: Index,
    lefts: HashMap<TupleId, LeftEntry<L>>,
    rights: HashMap<TupleId, RightEntry<R>>,
    output: OutputQueue<L>,
    downstream: Downstream<L>,
}

impl<L, R> ExistsNode<L, R>
where
    L: Facts,
    R: Fact,
{
    pub fn new(joiner: Joiner<L, R>, should_exist: bool) -> Self {
        let comparisons = joiner.comparisons();
        let name = if should_exist { "if_exists" } else { "if_not_exists" };
        Self {
            left_index: Index::for_left(&comparisons),
            right_index: Index::for_right(&comparisons),
            joiner,
            should_exist,
            left_input: InputBuffer::new(name),
            right_input: InputBuffer::new(name),
            lefts: HashMap::new(),
            rights: HashMap::new(),
            output: OutputQueue::new(name),
            downstream: Downstream::default(),
        }
    }

    /// Number of right facts currently matching the left tuple `id`.
    pub fn match_count(&self, id: TupleId) -> usize {
        self.lefts.get(&id).map_or(0, |left| left.matches.len())
    }

    fn right_matches(&self, facts: &L, keys: &[IndexKey]) -> BTreeSet<TupleId> {
        let mut found = BTreeSet::new();
        self.right_index.visit(keys, |rid| {
            if let Some(right) = self.rights.get(&rid) {
                if self.joiner.test_filters(facts, &right.fact) {
                    found.insert(rid);
                }
            }
        });
        found
    }

    fn left_matches(&self, fact: &R, keys: &[IndexKey]) -> BTreeSet<TupleId> {
        let mut found = BTreeSet::new();
        self.left_index.visit(keys, |lid| {
            if let Some(left) = self.lefts.get(&lid) {
                if self.joiner.test_filters(&left.facts, fact) {
                    found.insert(lid);
                }
            }
        });
        found
    }

    fn passes(&self, matches: &BTreeSet<TupleId>) -> bool {
        matches.is_empty() != self.should_exist
    }

    // Brings the output of left `id` in line with its match count.
    fn sync(&mut self, id: TupleId) {
        let Some(left) = self.lefts.get(&id) else {
            return;
        };
        let passes = left.matches.is_empty() != self.should_exist;
        match (self.output.is_alive(id), passes) {
            (false, true) => self.output.insert_with_id(id, left.facts.clone()),
            (true, false) => self.output.retract(id),
            _ => {}
        }
    }

    fn insert_left(&mut self, id: TupleId, facts: L) {
        let keys = self.joiner.left_keys(&facts);
        self.left_index.put(&keys, id);
        let matches = self.right_matches(&facts, &keys);
        for rid in &matches {
            if let Some(right) = self.rights.get_mut(rid) {
                right.lefts.insert(id);
            }
        }
        if self.passes(&matches) {
            self.output.insert_with_id(id, facts.clone());
        }
        self.lefts.insert(
            id,
            LeftEntry {
                facts,
                keys,
                matches,
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
        let matches = self.right_matches(&facts, &keys);
        for rid in entry.matches.difference(&matches) {
            if let Some(right) = self.rights.get_mut(rid) {
                right.lefts.remove(&id);
            }
        }
        for rid in matches.difference(&entry.matches) {
            if let Some(right) = self.rights.get_mut(rid) {
                right.lefts.insert(id);
            }
        }

        match (self.output.is_alive(id), self.passes(&matches)) {
            (true, true) => self.output.update(id, facts.clone()),
            (true, false) => self.output.retract(id),
            (false, true) => self.output.insert_with_id(id, facts.clone()),
            (false, false) => {}
        }

        entry.facts = facts;
        entry.keys = keys;
        entry.matches = matches;
        self.lefts.insert(id, entry);
    }

    fn retract_left(&mut self, id: TupleId) {
        let Some(entry) = self.lefts.remove(&id) else {
            return;
        };
        self.left_index.remove(&entry.keys, id);
        for rid in &entry.matches {
            if let Some(right) = self.rights.get_mut(rid) {
                right.lefts.remove(&id);
            }
        }
        if self.output.is_alive(id) {
            self.output.retract(id);
        }
    }

    fn insert_right(&mut self, id: TupleId, fact: R) {
        let keys = self.joiner.right_keys(&fact);
        self.right_index.put(&keys, id);
        let lefts = self.left_matches(&fact, &keys);
        self.rights.insert(
            id,
            RightEntry {
                fact,
                keys,
                lefts: lefts.clone(),
            },
        );
        for lid in lefts {
            if let Some(left) = self.lefts.get_mut(&lid) {
                left.matches.insert(id);
            }
            self.sync(lid);
        }
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
        let lefts = self.left_matches(&fact, &keys);
        let lost: Vec<TupleId> = entry.lefts.difference(&lefts).copied().collect();
        let gained: Vec<TupleId> = lefts.difference(&entry.lefts).copied().collect();

        entry.fact = fact;
        entry.keys = keys;
        entry.lefts = lefts;
        self.rights.insert(id, entry);

        for lid in lost {
            if let Some(left) = self.lefts.get_mut(&lid) {
                left.matches.remove(&id);
            }
            self.sync(lid);
        }
        for lid in gained {
            if let Some(left) = self.lefts.get_mut(&lid) {
                left.matches.insert(id);
            }
            self.sync(lid);
        }
    }

    fn retract_right(&mut self, id: TupleId) {
        let Some(entry) = self.rights.remove(&id) else {
            return;
        };
        self.right_index.remove(&entry.keys, id);
        for lid in entry.lefts {
            if let Some(left) = self.lefts.get_mut(&lid) {
                left.matches.remove(&id);
            }
            self.sync(lid);
        }
    }
}

impl<L, R> NetworkNode for ExistsNode<L, R>
where
    L: Facts,
    R: Fact,
{
    fn name(&self) -> &'static str {
        if self.should_exist {
            "if_exists"
        } else {
            "if_not_exists"
        }
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

impl<L: Facts, R: Fact> BiInput for ExistsNode<L, R> {
    type Left = L;
    type Right = (R,);

    fn left_input(&mut self) -> &mut InputBuffer<L> {
        &mut self.left_input
    }

    fn right_input(&mut self) -> &mut InputBuffer<(R,)> {
        &mut self.right_input
    }
}

impl<L: Facts, R: Fact> Source<L> for ExistsNode<L, R> {
    fn connect(&mut self, downstream: Box<dyn TupleLifecycle<L>>) {
        self.downstream.connect(downstream);
    }
}
