//! Staged changes of one node input.
//!
//! Upstream calls only record a change here. The owning node drains the
//! buffer when the network flushes its layer. Between flushes at most one
//! change survives per tuple id:
//!
//! | staged   | then     | result          |
//! |----------|----------|-----------------|
//! | insert   | update   | insert (new)    |
//! | insert   | retract  | nothing         |
//! | update   | update   | update (newest) |
//! | update   | retract  | retract         |
//!
//! Every other sequence breaks the tuple lifecycle and panics.

use std::collections::{HashMap, HashSet};

use crate::tuple::{Tuple, TupleId};

/// A staged change, carrying the newest facts for insert and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<F> {
    Insert(F),
    Update(F),
    Retract,
}

#[derive(Debug)]
pub struct InputBuffer<F> {
    node: &'static str,
    // Ids inserted by an earlier flush and not yet retracted.
    committed: HashSet<TupleId>,
    order: Vec<TupleId>,
    staged: HashMap<TupleId, Change<F>>,
}

impl<F: Clone> InputBuffer<F> {
    pub fn new(node: &'static str) -> Self {
        Self {
            node,
            committed: HashSet::new(),
            order: Vec::new(),
            staged: HashMap::new(),
        }
    }

    pub fn stage_insert(&mut self, tuple: &Tuple<F>) {
        let id = tuple.id();
        if self.committed.contains(&id) || self.staged.contains_key(&id) {
            panic!("{}: tuple {} inserted twice", self.node, id);
        }
        self.order.push(id);
        self.staged.insert(id, Change::Insert(tuple.facts().clone()));
    }

    pub fn stage_update(&mut self, tuple: &Tuple<F>) {
        let id = tuple.id();
        let facts = tuple.facts().clone();
        match self.staged.get_mut(&id) {
            Some(Change::Insert(staged)) | Some(Change::Update(staged)) => *staged = facts,
            Some(Change::Retract) => {
                panic!("{}: tuple {} updated after retract", self.node, id)
            }
            None if self.committed.contains(&id) => {
                self.order.push(id);
                self.staged.insert(id, Change::Update(facts));
            }
            None => panic!("{}: update of unknown tuple {}", self.node, id),
        }
    }

    pub fn stage_retract(&mut self, id: TupleId) {
        match self.staged.get(&id) {
            Some(Change::Insert(_)) => {
                // Never seen by the node, so nothing to undo.
                self.staged.remove(&id);
            }
            Some(Change::Update(_)) => {
                self.staged.insert(id, Change::Retract);
            }
            Some(Change::Retract) => {
                panic!("{}: tuple {} retracted twice", self.node, id)
            }
            None if self.committed.contains(&id) => {
                self.order.push(id);
                self.staged.insert(id, Change::Retract);
            }
            None => panic!("{}: retract of unknown tuple {}", self.node, id),
        }
    }

    /// Takes every staged change in first-staged order.
    pub fn drain(&mut self) -> Vec<(TupleId, Change<F>)> {
        let mut changes = Vec::with_capacity(self.staged.len());
        for id in self.order.drain(..) {
            if let Some(change) = self.staged.remove(&id) {
                match change {
                    Change::Insert(_) => {
                        self.committed.insert(id);
                    }
                    Change::Retract => {
                        self.committed.remove(&id);
                    }
                    Change::Update(_) => {}
                }
                changes.push((id, change));
            }
        }
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Number of tuples the node currently holds from this input.
    pub fn live_len(&self) -> usize {
        self.committed.len()
    }
}
