//! Output tuples owned by a node, consolidated until the node propagates.
//!
//! Within one flush a node may create, change and kill the same output tuple
//! several times. Each output tuple carries a [`TupleState`], and
//! [`OutputQueue::propagate`] sends every dirty tuple downstream exactly once:
//!
//! * `Creating` emits insert, `Updating` emits update, `Dying` emits retract;
//! * `Aborting` (created and killed in the same flush) emits nothing;
//! * a `Dying` tuple that is revived becomes `Updating`,
//!   an `Aborting` one becomes `Creating` again.

use std::collections::HashMap;

use crate::lifecycle::{Downstream, Propagated};
use crate::tuple::{Tuple, TupleId, TupleIds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleState {
    /// Inserted this flush, not yet propagated.
    Creating,
    /// Propagated and unchanged since.
    Ok,
    /// Propagated, facts changed this flush.
    Updating,
    /// Propagated, killed this flush.
    Dying,
    /// Created and killed in the same flush.
    Aborting,
}

impl TupleState {
    pub fn is_alive(self) -> bool {
        matches!(
            self,
            TupleState::Creating | TupleState::Ok | TupleState::Updating
        )
    }
}

#[derive(Debug)]
struct OutTuple<F> {
    tuple: Tuple<F>,
    state: TupleState,
}

#[derive(Debug)]
pub struct OutputQueue<F> {
    node: &'static str,
    ids: TupleIds,
    tuples: HashMap<TupleId, OutTuple<F>>,
    dirty: Vec<TupleId>,
}

impl<F> OutputQueue<F> {
    pub fn new(node: &'static str) -> Self {
        Self {
            node,
            ids: TupleIds::default(),
            tuples: HashMap::new(),
            dirty: Vec::new(),
        }
    }

    /// Creates an output tuple under a fresh id.
    pub fn insert(&mut self, facts: F) -> TupleId {
        let id = self.ids.next_id();
        self.tuples.insert(
            id,
            OutTuple {
                tuple: Tuple::new(id, facts),
                state: TupleState::Creating,
            },
        );
        self.dirty.push(id);
        id
    }

    /// Creates, or revives, an output tuple under an id chosen by the node.
    ///
    /// Pass-through nodes reuse their input ids this way.
    pub fn insert_with_id(&mut self, id: TupleId, facts: F) {
        match self.tuples.get_mut(&id) {
            Some(out) => {
                out.state = match out.state {
                    TupleState::Dying => TupleState::Updating,
                    TupleState::Aborting => TupleState::Creating,
                    state => panic!(
                        "{}: insert of output tuple {} in state {:?}",
                        self.node, id, state
                    ),
                };
                out.tuple.replace_facts(facts);
            }
            None => {
                self.tuples.insert(
                    id,
                    OutTuple {
                        tuple: Tuple::new(id, facts),
                        state: TupleState::Creating,
                    },
                );
                self.dirty.push(id);
            }
        }
    }

    pub fn update(&mut self, id: TupleId, facts: F) {
        let Some(out) = self.tuples.get_mut(&id) else {
            panic!("{}: update of unknown output tuple {}", self.node, id);
        };
        match out.state {
            TupleState::Creating | TupleState::Updating => {}
            TupleState::Ok => {
                out.state = TupleState::Updating;
                self.dirty.push(id);
            }
            state => panic!(
                "{}: update of output tuple {} in state {:?}",
                self.node, id, state
            ),
        }
        out.tuple.replace_facts(facts);
    }

    pub fn retract(&mut self, id: TupleId) {
        let Some(out) = self.tuples.get_mut(&id) else {
            panic!("{}: retract of unknown output tuple {}", self.node, id);
        };
        out.state = match out.state {
            TupleState::Creating => TupleState::Aborting,
            TupleState::Updating => TupleState::Dying,
            TupleState::Ok => {
                self.dirty.push(id);
                TupleState::Dying
            }
            state => panic!(
                "{}: retract of output tuple {} in state {:?}",
                self.node, id, state
            ),
        };
    }

    pub fn get(&self, id: TupleId) -> Option<&F> {
        self.tuples.get(&id).map(|out| out.tuple.facts())
    }

    pub fn state(&self, id: TupleId) -> Option<TupleState> {
        self.tuples.get(&id).map(|out| out.state)
    }

    pub fn is_alive(&self, id: TupleId) -> bool {
        self.state(id).is_some_and(TupleState::is_alive)
    }

    /// Number of output tuples that are alive, propagated or not.
    pub fn alive_len(&self) -> usize {
        self.tuples
            .values()
            .filter(|out| out.state.is_alive())
            .count()
    }

    pub fn is_settled(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Sends every dirty tuple downstream in the order it first became dirty.
    pub fn propagate(&mut self, downstream: &mut Downstream<F>) -> Propagated {
        let mut counts = Propagated::default();
        for id in std::mem::take(&mut self.dirty) {
            let Some(out) = self.tuples.get_mut(&id) else {
                continue;
            };
            let state = out.state;
            match state {
                TupleState::Creating => {
                    downstream.insert(&out.tuple);
                    out.state = TupleState::Ok;
                    counts.inserts += 1;
                }
                TupleState::Updating => {
                    downstream.update(&out.tuple);
                    out.state = TupleState::Ok;
                    counts.updates += 1;
                }
                TupleState::Dying => {
                    downstream.retract(&out.tuple);
                    self.tuples.remove(&id);
                    counts.retracts += 1;
                }
                TupleState::Aborting => {
                    self.tuples.remove(&id);
                }
                TupleState::Ok => {}
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Event, RecordingLifecycle};

    fn queue() -> (OutputQueue<(i32,)>, Downstream<(i32,)>, RecordingLifecycle<(i32,)>) {
        let recorder = RecordingLifecycle::new();
        let mut downstream = Downstream::default();
        downstream.connect(Box::new(recorder.clone()));
        (OutputQueue::new("test"), downstream, recorder)
    }

    #[test]
    fn test_created_then_killed_emits_nothing() {
        let (mut out, mut down, recorder) = queue();
        let id = out.insert((1,));
        out.retract(id);
        assert_eq!(out.propagate(&mut down), Propagated::default());
        assert!(recorder.events().is_empty());
        assert_eq!(out.state(id), None);
    }

    #[test]
    fn test_changes_consolidate() {
        let (mut out, mut down, recorder) = queue();
        let id = out.insert((1,));
        out.update(id, (2,));
        out.propagate(&mut down);
        out.update(id, (3,));
        out.update(id, (4,));
        let counts = out.propagate(&mut down);
        assert_eq!(counts.updates, 1);
        assert_eq!(
            recorder.events(),
            vec![Event::Insert(id, (2,)), Event::Update(id, (4,))]
        );
    }

    #[test]
    fn test_killed_then_revived_emits_update() {
        let (mut out, mut down, recorder) = queue();
        let id = TupleId::new(42);
        out.insert_with_id(id, (1,));
        out.propagate(&mut down);
        out.retract(id);
        out.insert_with_id(id, (5,));
        out.propagate(&mut down);
        assert_eq!(
            recorder.events(),
            vec![Event::Insert(id, (1,)), Event::Update(id, (5,))]
        );
        assert!(out.is_alive(id));
    }

    #[test]
    fn test_retract_removes_after_propagate() {
        let (mut out, mut down, recorder) = queue();
        let id = out.insert((1,));
        out.propagate(&mut down);
        out.retract(id);
        assert!(!out.is_alive(id));
        assert_eq!(out.propagate(&mut down).retracts, 1);
        assert_eq!(recorder.events().last(), Some(&Event::Retract(id)));
        assert_eq!(out.alive_len(), 0);
        assert!(out.is_settled());
    }

    #[test]
    #[should_panic(expected = "retract of output tuple")]
    fn test_double_retract_panics() {
        let (mut out, _down, _recorder) = queue();
        let id = out.insert((1,));
        out.retract(id);
        out.retract(id);
    }
}
