//! The built constraint network and its score query surface.
//!
//! Fact changes are staged into the entry nodes of the fact's class and
//! reach the terminals only when [`ConstraintNetwork::flush`] runs. The
//! score is always the sum of the terminals' running totals as of the last
//! flush.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use solverforge_config::EnvironmentMode;
use solverforge_core::Score;
use tracing::{debug, trace};

use crate::api::{ConstraintAnalysis, IndictmentMap, ScoreExplanation};
use crate::lifecycle::Propagated;
use crate::node::{ConstraintScorer, EntryNode, NetworkNode};
use crate::tuple::{Fact, TupleId};

/// Handle of a fact inserted into a network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactHandle(u64);

impl FactHandle {
    pub fn raw(self) -> u64 {
        self.0
    }

    fn tuple_id(self) -> TupleId {
        TupleId::new(self.0)
    }
}

impl fmt::Debug for FactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactHandle({})", self.0)
    }
}

/// The entry nodes of one fact class.
pub(crate) struct EntryGroup<A> {
    nodes: Vec<Rc<RefCell<EntryNode<A>>>>,
}

impl<A> Default for EntryGroup<A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<A: Fact> EntryGroup<A> {
    pub(crate) fn push(&mut self, node: Rc<RefCell<EntryNode<A>>>) {
        self.nodes.push(node);
    }

    fn stage_insert(&self, id: TupleId, fact: &A) {
        for node in &self.nodes {
            node.borrow_mut().stage_insert(id, fact.clone());
        }
    }

    fn stage_update(&self, id: TupleId, fact: &A) {
        for node in &self.nodes {
            node.borrow_mut().stage_update(id, fact.clone());
        }
    }

    fn stage_retract(&self, id: TupleId) {
        for node in &self.nodes {
            node.borrow_mut().stage_retract(id);
        }
    }
}

/// An acyclic network of propagation nodes ending in constraint terminals.
///
/// Single-threaded: a network is neither `Send` nor `Sync`. Build one network
/// per thread to evaluate in parallel.
pub struct ConstraintNetwork<Sc: Score> {
    // Ascending layer order.
    nodes: Vec<(usize, Rc<RefCell<dyn NetworkNode>>)>,
    entries: HashMap<TypeId, Box<dyn Any>>,
    scorers: Vec<Rc<RefCell<dyn ConstraintScorer<Sc>>>>,
    handles: HashMap<FactHandle, TypeId>,
    next_handle: u64,
    environment_mode: EnvironmentMode,
    flush_count: u64,
}

impl<Sc: Score> ConstraintNetwork<Sc> {
    pub(crate) fn new(
        nodes: Vec<(usize, Rc<RefCell<dyn NetworkNode>>)>,
        entries: HashMap<TypeId, Box<dyn Any>>,
        scorers: Vec<Rc<RefCell<dyn ConstraintScorer<Sc>>>>,
        environment_mode: EnvironmentMode,
    ) -> Self {
        Self {
            nodes,
            entries,
            scorers,
            handles: HashMap::new(),
            next_handle: 0,
            environment_mode,
            flush_count: 0,
        }
    }

    fn entry_group<A: Fact>(&self) -> Option<&EntryGroup<A>> {
        self.entries
            .get(&TypeId::of::<A>())
            .and_then(|group| group.downcast_ref::<EntryGroup<A>>())
    }

    fn check_handle<A: Fact>(&self, handle: FactHandle, operation: &str) {
        match self.handles.get(&handle) {
            Some(class) if *class == TypeId::of::<A>() => {}
            Some(_) => panic!(
                "{} of {:?} as {}, which is not its class",
                operation,
                handle,
                std::any::type_name::<A>()
            ),
            None => panic!("{} of unknown fact handle {:?}", operation, handle),
        }
    }

    /// Stages a new fact. Facts of a class no stream consumes are tracked
    /// but reach no node.
    pub fn insert<A: Fact>(&mut self, fact: A) -> FactHandle {
        let handle = FactHandle(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(handle, TypeId::of::<A>());
        if let Some(group) = self.entry_group::<A>() {
            group.stage_insert(handle.tuple_id(), &fact);
        }
        handle
    }

    /// Stages a changed fact.
    ///
    /// # Panics
    ///
    /// Panics if the handle is unknown, retracted, or of another class.
    pub fn update<A: Fact>(&mut self, handle: FactHandle, fact: A) {
        self.check_handle::<A>(handle, "update");
        if let Some(group) = self.entry_group::<A>() {
            group.stage_update(handle.tuple_id(), &fact);
        }
    }

    /// Stages the removal of a fact.
    ///
    /// # Panics
    ///
    /// Panics if the handle is unknown, retracted, or of another class.
    pub fn retract<A: Fact>(&mut self, handle: FactHandle) {
        self.check_handle::<A>(handle, "retract");
        self.handles.remove(&handle);
        if let Some(group) = self.entry_group::<A>() {
            group.stage_retract(handle.tuple_id());
        }
    }

    /// Flushes every node once, in ascending layer order.
    ///
    /// Returns the number of calls the nodes emitted downstream, terminals
    /// included.
    pub fn flush(&mut self) -> Propagated {
        let mut total = Propagated::default();
        for (layer, node) in &self.nodes {
            let mut node = node.borrow_mut();
            let emitted = node.flush();
            if !emitted.is_empty() {
                trace!(
                    node = node.name(),
                    layer = *layer,
                    inserts = emitted.inserts,
                    updates = emitted.updates,
                    retracts = emitted.retracts,
                );
            }
            total += emitted;
        }
        self.flush_count += 1;

        if self.environment_mode.is_asserted() {
            for (layer, node) in &self.nodes {
                let node = node.borrow();
                assert!(
                    node.is_settled(),
                    "{} node on layer {} still has staged changes after flush",
                    node.name(),
                    layer
                );
            }
        }
        if self.environment_mode.is_fully_asserted() {
            for scorer in &self.scorers {
                scorer.borrow().verify();
            }
        }

        if !total.is_empty() {
            debug!(
                event = "flush",
                flush = self.flush_count,
                inserts = total.inserts,
                updates = total.updates,
                retracts = total.retracts,
                score = %self.score(),
            );
        }
        total
    }

    /// Flushes, then returns the total score.
    pub fn calculate_score(&mut self) -> Sc {
        self.flush();
        self.score()
    }

    /// Total score as of the last flush.
    pub fn score(&self) -> Sc {
        self.scorers
            .iter()
            .fold(Sc::zero(), |total, scorer| total + scorer.borrow().score())
    }

    /// Score of one constraint by full name, as of the last flush.
    pub fn constraint_score(&self, full_name: &str) -> Option<Sc> {
        self.scorers
            .iter()
            .map(|scorer| scorer.borrow())
            .find(|scorer| scorer.constraint_ref().full_name() == full_name)
            .map(|scorer| scorer.score())
    }

    /// Per-constraint breakdown, in definition order.
    pub fn constraint_analyses(&self) -> Vec<ConstraintAnalysis<Sc>> {
        self.scorers
            .iter()
            .map(|scorer| scorer.borrow().analysis())
            .collect()
    }

    pub fn analyze(&self) -> ScoreExplanation<Sc> {
        ScoreExplanation::new(self.score(), self.constraint_analyses())
    }

    /// Score impact per fact; empty when constraint matching is disabled.
    pub fn indictments(&self) -> IndictmentMap<Sc> {
        IndictmentMap::from_explanation(&self.analyze())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.scorers.len()
    }

    /// Number of live facts, consumed or not.
    pub fn fact_count(&self) -> usize {
        self.handles.len()
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }
}

impl<Sc: Score> fmt::Debug for ConstraintNetwork<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintNetwork")
            .field("nodes", &self.nodes.len())
            .field("constraints", &self.scorers.len())
            .field("facts", &self.handles.len())
            .finish()
    }
}
