// Constraint factory: the entry point for defining a constraint network.
//
// Streams created from one factory share its node registry. `build`
// validates the graph and hands every node to a `ConstraintNetwork`.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use solverforge_config::{EnvironmentMode, NetworkConfig};
use solverforge_core::{ParseableScore, Score};
use tracing::info;

use super::Stream;
use crate::api::ConstraintWeightOverrides;
use crate::error::NetworkError;
use crate::network::{ConstraintNetwork, EntryGroup};
use crate::node::{ConstraintScorer, EntryNode, NetworkNode};
use crate::tuple::Fact;

pub(crate) struct FactoryState<Sc: Score> {
    nodes: Vec<(usize, Rc<RefCell<dyn NetworkNode>>)>,
    entries: HashMap<TypeId, Box<dyn Any>>,
    scorers: Vec<Rc<RefCell<dyn ConstraintScorer<Sc>>>>,
    overrides: ConstraintWeightOverrides<Sc>,
    environment_mode: EnvironmentMode,
    match_enabled: bool,
}

impl<Sc: Score> FactoryState<Sc> {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            entries: HashMap::new(),
            scorers: Vec::new(),
            overrides: ConstraintWeightOverrides::new(),
            environment_mode: EnvironmentMode::default(),
            match_enabled: true,
        }
    }
}

// Factory for constraint streams scored in `Sc`.
//
// # Example
//
// ```
// use solverforge_core::SimpleScore;
// use solverforge_network::ConstraintFactory;
//
// let factory = ConstraintFactory::<SimpleScore>::new();
// factory
//     .for_each::<i32>()
//     .filter(|(x,): &(i32,)| *x < 0)
//     .penalize("negative", SimpleScore::ONE);
//
// let mut network = factory.build().unwrap();
// network.insert(-3);
// network.insert(4);
// assert_eq!(network.calculate_score(), SimpleScore::of(-1));
// ```
pub struct ConstraintFactory<Sc: Score> {
    pub(crate) state: Rc<RefCell<FactoryState<Sc>>>,
}

impl<Sc: Score> Clone for ConstraintFactory<Sc> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<Sc: Score> Default for ConstraintFactory<Sc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Sc: Score> ConstraintFactory<Sc> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FactoryState::new())),
        }
    }

    // Applies environment mode, match retention and weight overrides.
    pub fn with_config(self, config: &NetworkConfig) -> Result<Self, NetworkError>
    where
        Sc: ParseableScore,
    {
        let overrides = ConstraintWeightOverrides::from_pairs(config.parsed_weights::<Sc>()?);
        {
            let mut state = self.state.borrow_mut();
            state.environment_mode = config.environment_mode;
            state.match_enabled = config.constraint_match_enabled;
            state.overrides.extend(overrides);
        }
        Ok(self)
    }

    pub fn with_weight_overrides(self, overrides: ConstraintWeightOverrides<Sc>) -> Self {
        self.state.borrow_mut().overrides.extend(overrides);
        self
    }

    pub fn with_environment_mode(self, mode: EnvironmentMode) -> Self {
        self.state.borrow_mut().environment_mode = mode;
        self
    }

    // Starts a stream over every fact of class `A`.
    //
    // Each call creates its own entry node; facts inserted into the network
    // reach all entry nodes of their class.
    pub fn for_each<A: Fact>(&self) -> Stream<(A,), Sc> {
        let node = Rc::new(RefCell::new(EntryNode::<A>::new()));
        {
            let mut state = self.state.borrow_mut();
            let group = state
                .entries
                .entry(TypeId::of::<A>())
                .or_insert_with(|| Box::new(EntryGroup::<A>::default()));
            if let Some(group) = group.downcast_mut::<EntryGroup<A>>() {
                group.push(Rc::clone(&node));
            }
        }
        self.register(Rc::clone(&node), 0);
        Stream::new(self.clone(), node, 0)
    }

    pub(crate) fn register<N: NetworkNode + 'static>(&self, node: Rc<RefCell<N>>, layer: usize) {
        let node: Rc<RefCell<dyn NetworkNode>> = node;
        self.state.borrow_mut().nodes.push((layer, node));
    }

    pub(crate) fn register_scorer<T: ConstraintScorer<Sc> + 'static>(&self, scorer: Rc<RefCell<T>>) {
        let scorer: Rc<RefCell<dyn ConstraintScorer<Sc>>> = scorer;
        self.state.borrow_mut().scorers.push(scorer);
    }

    pub(crate) fn same_factory(&self, other: &ConstraintFactory<Sc>) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    // Validates the defined constraints and builds the network.
    //
    // Fails when a stream was left without a consumer, two constraints share
    // a name, or a weight override cannot be applied.
    pub fn build(self) -> Result<ConstraintNetwork<Sc>, NetworkError> {
        let mut state = std::mem::replace(&mut *self.state.borrow_mut(), FactoryState::new());

        for (_, node) in &state.nodes {
            let node = node.borrow();
            if !node.is_connected() {
                return Err(NetworkError::UnconsumedStream { node: node.name() });
            }
        }

        let mut names = HashSet::new();
        for scorer in &state.scorers {
            let name = scorer.borrow().constraint_ref().full_name();
            if !names.insert(name.clone()) {
                return Err(NetworkError::DuplicateConstraint { name });
            }
        }

        for name in state.overrides.names() {
            let Some(scorer) = state
                .scorers
                .iter()
                .find(|s| s.borrow().constraint_ref().full_name() == name)
            else {
                return Err(NetworkError::UnknownConstraint {
                    name: name.to_string(),
                });
            };
            let Some(&weight) = state.overrides.get(name) else {
                continue;
            };
            if !scorer.borrow_mut().set_weight(weight) {
                return Err(NetworkError::FixedImpact {
                    name: name.to_string(),
                });
            }
        }

        for scorer in &state.scorers {
            scorer.borrow_mut().set_match_enabled(state.match_enabled);
        }

        // Stable: nodes of one layer keep their definition order.
        state.nodes.sort_by_key(|(layer, _)| *layer);

        info!(
            event = "network_built",
            node_count = state.nodes.len(),
            constraint_count = state.scorers.len(),
            environment_mode = ?state.environment_mode,
        );

        Ok(ConstraintNetwork::new(
            state.nodes,
            state.entries,
            state.scorers,
            state.environment_mode,
        ))
    }
}
