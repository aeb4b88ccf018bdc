// Typed constraint stream over fact groups `F`.
//
// Every operation consumes the stream, creates one node one layer below its
// deepest input and returns the stream of that node's output. A terminal
// (`penalize*` / `reward*`) ends the stream in a score accumulator.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use solverforge_core::{ConstraintRef, ImpactType, MatchWeighted, Score};

use super::ConstraintFactory;
use crate::collector::Collector;
use crate::joiner::{filtering, Joiner};
use crate::node::{
    ExistsNode, FilterNode, FlattenNode, GroupNode, JoinNode, KeyCollector, LeftInput, MapNode,
    MatchImpact, NodeInput, RightInput, ScorerNode, Source,
};
use crate::tuple::{Append, Fact, Facts, ReplaceLast};

pub struct Stream<F, Sc: Score> {
    factory: ConstraintFactory<Sc>,
    source: Rc<RefCell<dyn Source<F>>>,
    layer: usize,
}

impl<F, Sc> Stream<F, Sc>
where
    F: Facts,
    Sc: Score,
{
    pub(crate) fn new(
        factory: ConstraintFactory<Sc>,
        source: Rc<RefCell<dyn Source<F>>>,
        layer: usize,
    ) -> Self {
        Self {
            factory,
            source,
            layer,
        }
    }

    // Layer of the node feeding this stream; entry nodes are layer 0.
    pub fn layer(&self) -> usize {
        self.layer
    }

    fn assert_same_factory<G: Facts>(&self, other: &Stream<G, Sc>) {
        assert!(
            self.factory.same_factory(&other.factory),
            "streams from different constraint factories cannot be combined"
        );
    }

    pub fn filter<P>(self, predicate: P) -> Stream<F, Sc>
    where
        P: Fn(&F) -> bool + 'static,
    {
        let node = Rc::new(RefCell::new(FilterNode::new(predicate)));
        self.source
            .borrow_mut()
            .connect(Box::new(NodeInput::new(Rc::clone(&node))));
        let layer = self.layer + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    pub fn map<U, M>(self, mapping: M) -> Stream<(U,), Sc>
    where
        U: Fact,
        M: Fn(&F) -> U + 'static,
    {
        let node = Rc::new(RefCell::new(MapNode::new(mapping)));
        self.source
            .borrow_mut()
            .connect(Box::new(NodeInput::new(Rc::clone(&node))));
        let layer = self.layer + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // Fans every tuple out into one uni tuple per produced value.
    pub fn flatten<V, I, M>(self, mapping: M) -> Stream<(V,), Sc>
    where
        V: Fact + Eq + Hash,
        I: IntoIterator<Item = V> + 'static,
        M: Fn(&F) -> I + 'static,
    {
        let node = Rc::new(RefCell::new(FlattenNode::new(
            mapping,
            |_: &F, value: &V| (value.clone(),),
        )));
        self.source
            .borrow_mut()
            .connect(Box::new(NodeInput::new(Rc::clone(&node))));
        let layer = self.layer + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // Fans every tuple out, replacing its last fact by each produced value.
    pub fn flatten_last<V, I, M>(self, mapping: M) -> Stream<F::Output, Sc>
    where
        F: ReplaceLast<V>,
        V: Fact + Eq + Hash,
        I: IntoIterator<Item = V> + 'static,
        M: Fn(&F) -> I + 'static,
    {
        let node = Rc::new(RefCell::new(FlattenNode::new(
            mapping,
            |facts: &F, value: &V| facts.replace_last(value.clone()),
        )));
        self.source
            .borrow_mut()
            .connect(Box::new(NodeInput::new(Rc::clone(&node))));
        let layer = self.layer + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // Pairs every tuple with each matching fact of `other`.
    //
    // # Panics
    //
    // Panics if `other` comes from a different factory.
    pub fn join<B>(self, other: Stream<(B,), Sc>, joiner: Joiner<F, B>) -> Stream<F::Output, Sc>
    where
        F: Append<B>,
        B: Fact,
    {
        self.assert_same_factory(&other);
        let node = Rc::new(RefCell::new(JoinNode::new(joiner)));
        self.source
            .borrow_mut()
            .connect(Box::new(LeftInput::new(Rc::clone(&node))));
        other
            .source
            .borrow_mut()
            .connect(Box::new(RightInput::new(Rc::clone(&node))));
        let layer = self.layer.max(other.layer) + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // Keeps tuples with at least one matching fact in `other`.
    pub fn if_exists<B: Fact>(self, other: Stream<(B,), Sc>, joiner: Joiner<F, B>) -> Stream<F, Sc> {
        self.existence(other, joiner, true)
    }

    // Keeps tuples without any matching fact in `other`.
    pub fn if_not_exists<B: Fact>(
        self,
        other: Stream<(B,), Sc>,
        joiner: Joiner<F, B>,
    ) -> Stream<F, Sc> {
        self.existence(other, joiner, false)
    }

    fn existence<B: Fact>(
        self,
        other: Stream<(B,), Sc>,
        joiner: Joiner<F, B>,
        should_exist: bool,
    ) -> Stream<F, Sc> {
        self.assert_same_factory(&other);
        let node = Rc::new(RefCell::new(ExistsNode::new(joiner, should_exist)));
        self.source
            .borrow_mut()
            .connect(Box::new(LeftInput::new(Rc::clone(&node))));
        other
            .source
            .borrow_mut()
            .connect(Box::new(RightInput::new(Rc::clone(&node))));
        let layer = self.layer.max(other.layer) + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // Groups tuples by key, emitting `(key, collected result)` per group.
    pub fn group_by<K, KF, C>(self, key_fn: KF, collector: C) -> Stream<(K, C::Result), Sc>
    where
        K: Fact + Eq + Hash,
        KF: Fn(&F) -> K + 'static,
        C: Collector<F>,
    {
        let node = Rc::new(RefCell::new(GroupNode::new(
            key_fn,
            collector,
            |key: &K, result: &C::Result| (key.clone(), result.clone()),
        )));
        self.source
            .borrow_mut()
            .connect(Box::new(NodeInput::new(Rc::clone(&node))));
        let layer = self.layer + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // Distinct keys of the stream, one `(key,)` tuple per non-empty group.
    pub fn group_by_key<K, KF>(self, key_fn: KF) -> Stream<(K,), Sc>
    where
        K: Fact + Eq + Hash,
        KF: Fn(&F) -> K + 'static,
    {
        let node = Rc::new(RefCell::new(GroupNode::new(
            key_fn,
            KeyCollector::<F>::new(),
            |key: &K, _: &()| (key.clone(),),
        )));
        self.source
            .borrow_mut()
            .connect(Box::new(NodeInput::new(Rc::clone(&node))));
        let layer = self.layer + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // One tuple per distinct fact group; equal groups collapse into one.
    //
    // The surviving tuple is retracted only when its last equal source goes.
    pub fn distinct(self) -> Stream<F, Sc>
    where
        F: Eq + Hash,
    {
        let node = Rc::new(RefCell::new(GroupNode::new(
            |facts: &F| facts.clone(),
            KeyCollector::<F>::new(),
            |key: &F, _: &()| key.clone(),
        )));
        self.source
            .borrow_mut()
            .connect(Box::new(NodeInput::new(Rc::clone(&node))));
        let layer = self.layer + 1;
        self.factory.register(Rc::clone(&node), layer);
        Stream::new(self.factory, node, layer)
    }

    // Penalizes every match by `weight`.
    pub fn penalize(self, name: impl Into<ConstraintRef>, weight: Sc) {
        self.terminate(name.into(), ImpactType::Penalty, unit_weight(weight));
    }

    // Penalizes every match by `weight` scaled by the match weight.
    pub fn penalize_weighted<M, W>(self, name: impl Into<ConstraintRef>, weight: Sc, weigher: W)
    where
        Sc: MatchWeighted<M>,
        M: 'static,
        W: Fn(&F) -> M + 'static,
    {
        self.terminate(
            name.into(),
            ImpactType::Penalty,
            scaled_weight(weight, weigher),
        );
    }

    // Penalizes every match by the impact `impact_fn` returns.
    pub fn penalize_with<W>(self, name: impl Into<ConstraintRef>, impact_fn: W)
    where
        W: Fn(&F) -> Sc + 'static,
    {
        self.terminate(
            name.into(),
            ImpactType::Penalty,
            MatchImpact::Fixed(Box::new(impact_fn)),
        );
    }

    pub fn reward(self, name: impl Into<ConstraintRef>, weight: Sc) {
        self.terminate(name.into(), ImpactType::Reward, unit_weight(weight));
    }

    pub fn reward_weighted<M, W>(self, name: impl Into<ConstraintRef>, weight: Sc, weigher: W)
    where
        Sc: MatchWeighted<M>,
        M: 'static,
        W: Fn(&F) -> M + 'static,
    {
        self.terminate(
            name.into(),
            ImpactType::Reward,
            scaled_weight(weight, weigher),
        );
    }

    pub fn reward_with<W>(self, name: impl Into<ConstraintRef>, impact_fn: W)
    where
        W: Fn(&F) -> Sc + 'static,
    {
        self.terminate(
            name.into(),
            ImpactType::Reward,
            MatchImpact::Fixed(Box::new(impact_fn)),
        );
    }

    fn terminate(self, constraint_ref: ConstraintRef, impact_type: ImpactType, impact: MatchImpact<F, Sc>) {
        let scorer = Rc::new(RefCell::new(ScorerNode::new(
            constraint_ref,
            impact_type,
            impact,
        )));
        self.source.borrow_mut().connect(Box::new(Rc::clone(&scorer)));
        self.factory.register_scorer(scorer);
    }
}

impl<A, Sc> Stream<(A,), Sc>
where
    A: Fact + PartialEq,
    Sc: Score,
{
    // Keeps facts for which some unequal fact of the same class matches.
    pub fn if_exists_other(self, joiner: Joiner<(A,), A>) -> Stream<(A,), Sc> {
        let others = self.factory.for_each::<A>();
        self.if_exists(others, joiner.and(unequal()))
    }

    // Keeps facts for which no unequal fact of the same class matches.
    pub fn if_not_exists_other(self, joiner: Joiner<(A,), A>) -> Stream<(A,), Sc> {
        let others = self.factory.for_each::<A>();
        self.if_not_exists(others, joiner.and(unequal()))
    }
}

fn unequal<A: Fact + PartialEq>() -> Joiner<(A,), A> {
    filtering(|(a,): &(A,), b: &A| a != b)
}

fn unit_weight<F: Facts, Sc: Score>(weight: Sc) -> MatchImpact<F, Sc> {
    MatchImpact::Weighted {
        weight,
        weigher: Box::new(|_: &F, weight: &Sc| *weight),
    }
}

fn scaled_weight<F, Sc, M, W>(weight: Sc, weigher: W) -> MatchImpact<F, Sc>
where
    F: Facts,
    Sc: MatchWeighted<M>,
    M: 'static,
    W: Fn(&F) -> M + 'static,
{
    MatchImpact::Weighted {
        weight,
        weigher: Box::new(move |facts: &F, weight: &Sc| weight.weighted(weigher(facts))),
    }
}
