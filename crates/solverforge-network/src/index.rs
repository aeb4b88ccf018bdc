//! Nested per-level index over tuple ids.
//!
//! Level `i` of the index is keyed on the tuple's `i`-th joiner key: a hash
//! map for equality levels, a `BTreeMap` for ordering levels. The innermost
//! level holds an ordered set of ids. A query walks equal levels by lookup
//! and ordering levels by range, so it returns exactly the stored ids whose
//! keys satisfy every comparison.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use crate::joiner::{IndexKey, JoinerComparison};
use crate::tuple::TupleId;

#[derive(Debug)]
enum IndexNode {
    Leaf(BTreeSet<TupleId>),
    Hashed(HashMap<IndexKey, IndexNode>),
    Sorted(BTreeMap<IndexKey, IndexNode>),
}

impl IndexNode {
    fn empty(comparisons: &[JoinerComparison]) -> Self {
        match comparisons.first() {
            None => IndexNode::Leaf(BTreeSet::new()),
            Some(JoinerComparison::Equal) => IndexNode::Hashed(HashMap::new()),
            Some(_) => IndexNode::Sorted(BTreeMap::new()),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            IndexNode::Leaf(ids) => ids.is_empty(),
            IndexNode::Hashed(map) => map.is_empty(),
            IndexNode::Sorted(map) => map.is_empty(),
        }
    }

    fn put(&mut self, comparisons: &[JoinerComparison], keys: &[IndexKey], id: TupleId) {
        match self {
            IndexNode::Leaf(ids) => {
                ids.insert(id);
            }
            IndexNode::Hashed(map) => map
                .entry(keys[0].clone())
                .or_insert_with(|| IndexNode::empty(&comparisons[1..]))
                .put(&comparisons[1..], &keys[1..], id),
            IndexNode::Sorted(map) => map
                .entry(keys[0].clone())
                .or_insert_with(|| IndexNode::empty(&comparisons[1..]))
                .put(&comparisons[1..], &keys[1..], id),
        }
    }

    fn remove(&mut self, keys: &[IndexKey], id: TupleId) -> bool {
        match self {
            IndexNode::Leaf(ids) => ids.remove(&id),
            IndexNode::Hashed(map) => {
                let Some(child) = map.get_mut(&keys[0]) else {
                    return false;
                };
                let removed = child.remove(&keys[1..], id);
                if child.is_empty() {
                    map.remove(&keys[0]);
                }
                removed
            }
            IndexNode::Sorted(map) => {
                let Some(child) = map.get_mut(&keys[0]) else {
                    return false;
                };
                let removed = child.remove(&keys[1..], id);
                if child.is_empty() {
                    map.remove(&keys[0]);
                }
                removed
            }
        }
    }

    fn visit(
        &self,
        comparisons: &[JoinerComparison],
        query: &[IndexKey],
        out: &mut impl FnMut(TupleId),
    ) {
        match self {
            IndexNode::Leaf(ids) => ids.iter().copied().for_each(out),
            IndexNode::Hashed(map) => {
                if let Some(child) = map.get(&query[0]) {
                    child.visit(&comparisons[1..], &query[1..], out);
                }
            }
            IndexNode::Sorted(map) => {
                for (_, child) in map.range(stored_range(comparisons[0], &query[0])) {
                    child.visit(&comparisons[1..], &query[1..], out);
                }
            }
        }
    }
}

// Bounds on the stored key `s` such that `s <op> q` holds.
fn stored_range(comparison: JoinerComparison, q: &IndexKey) -> (Bound<&IndexKey>, Bound<&IndexKey>) {
    match comparison {
        JoinerComparison::Equal => (Bound::Included(q), Bound::Included(q)),
        JoinerComparison::LessThan => (Bound::Unbounded, Bound::Excluded(q)),
        JoinerComparison::LessThanOrEqual => (Bound::Unbounded, Bound::Included(q)),
        JoinerComparison::GreaterThan => (Bound::Excluded(q), Bound::Unbounded),
        JoinerComparison::GreaterThanOrEqual => (Bound::Included(q), Bound::Unbounded),
    }
}

/// Index of one join side.
///
/// `comparisons[i]` relates the stored key to the query key: a stored id is
/// returned when `stored[i] <comparisons[i]> query[i]` for every level.
#[derive(Debug)]
pub struct Index {
    comparisons: Vec<JoinerComparison>,
    root: IndexNode,
    len: usize,
}

impl Index {
    pub fn new(comparisons: Vec<JoinerComparison>) -> Self {
        let root = IndexNode::empty(&comparisons);
        Self {
            comparisons,
            root,
            len: 0,
        }
    }

    /// Index of the left side, probed with right keys.
    pub fn for_left(joiner_comparisons: &[JoinerComparison]) -> Self {
        Self::new(joiner_comparisons.to_vec())
    }

    /// Index of the right side, probed with left keys.
    pub fn for_right(joiner_comparisons: &[JoinerComparison]) -> Self {
        Self::new(joiner_comparisons.iter().map(|c| c.flip()).collect())
    }

    pub fn put(&mut self, keys: &[IndexKey], id: TupleId) {
        debug_assert_eq!(keys.len(), self.comparisons.len());
        self.root.put(&self.comparisons, keys, id);
        self.len += 1;
    }

    /// Removes `id` stored under `keys`; returns false if it was absent.
    pub fn remove(&mut self, keys: &[IndexKey], id: TupleId) -> bool {
        let removed = self.root.remove(keys, id);
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn visit(&self, query: &[IndexKey], mut out: impl FnMut(TupleId)) {
        self.root.visit(&self.comparisons, query, &mut out);
    }

    pub fn matching(&self, query: &[IndexKey]) -> Vec<TupleId> {
        let mut ids = Vec::new();
        self.visit(query, |id| ids.push(id));
        ids
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
