//! Terminal node accumulating the score of one constraint.

use std::collections::BTreeMap;

use solverforge_core::{ConstraintRef, ImpactType, Score};

use crate::api::{ConstraintAnalysis, ConstraintJustification, DetailedConstraintMatch};
use crate::lifecycle::TupleLifecycle;
use crate::tuple::{Facts, Tuple, TupleId};

/// How a terminal turns a matched tuple into an unsigned impact.
pub enum MatchImpact<F, Sc> {
    /// The constraint weight scaled by a per-match weight.
    Weighted {
        weight: Sc,
        weigher: Box<dyn Fn(&F, &Sc) -> Sc>,
    },
    /// The impact computed directly from the match.
    Fixed(Box<dyn Fn(&F) -> Sc>),
}

struct Match<F, Sc> {
    impact: Sc,
    facts: Option<F>,
}

/// Running total of one constraint over the tuples reaching it.
///
/// Retract subtracts the impact recorded when the match was inserted or
/// last updated, so the total never depends on facts changing underneath.
pub struct ScorerNode<F, Sc> {
    constraint_ref: ConstraintRef,
    impact_type: ImpactType,
    impact: MatchImpact<F, Sc>,
    matches: BTreeMap<TupleId, Match<F, Sc>>,
    total: Sc,
    match_enabled: bool,
}

impl<F, Sc> ScorerNode<F, Sc>
where
    F: Facts,
    Sc: Score,
{
    pub fn new(
        constraint_ref: ConstraintRef,
        impact_type: ImpactType,
        impact: MatchImpact<F, Sc>,
    ) -> Self {
        Self {
            constraint_ref,
            impact_type,
            impact,
            matches: BTreeMap::new(),
            total: Sc::zero(),
            match_enabled: true,
        }
    }

    fn signed_impact(&self, facts: &F) -> Sc {
        let raw = match &self.impact {
            MatchImpact::Weighted { weight, weigher } => weigher(facts, weight),
            MatchImpact::Fixed(impact) => impact(facts),
        };
        self.impact_type.apply(raw)
    }

    fn retained(&self, facts: &F) -> Option<F> {
        self.match_enabled.then(|| facts.clone())
    }
}

impl<F, Sc> TupleLifecycle<F> for ScorerNode<F, Sc>
where
    F: Facts,
    Sc: Score,
{
    fn insert(&mut self, tuple: &Tuple<F>) {
        let impact = self.signed_impact(tuple.facts());
        let facts = self.retained(tuple.facts());
        if self.matches.insert(tuple.id(), Match { impact, facts }).is_some() {
            panic!(
                "{}: match {} inserted twice",
                self.constraint_ref,
                tuple.id()
            );
        }
        self.total = self.total + impact;
    }

    fn update(&mut self, tuple: &Tuple<F>) {
        let impact = self.signed_impact(tuple.facts());
        let facts = self.retained(tuple.facts());
        let Some(entry) = self.matches.get_mut(&tuple.id()) else {
            panic!(
                "{}: update of unknown match {}",
                self.constraint_ref,
                tuple.id()
            );
        };
        self.total = self.total - entry.impact + impact;
        entry.impact = impact;
        entry.facts = facts;
    }

    fn retract(&mut self, tuple: &Tuple<F>) {
        let Some(entry) = self.matches.remove(&tuple.id()) else {
            panic!(
                "{}: retract of unknown match {}",
                self.constraint_ref,
                tuple.id()
            );
        };
        self.total = self.total - entry.impact;
    }
}

/// Type-erased view of a terminal, held by the network.
pub trait ConstraintScorer<Sc: Score> {
    fn constraint_ref(&self) -> &ConstraintRef;

    fn impact_type(&self) -> ImpactType;

    /// `None` when the impact is computed directly.
    fn weight(&self) -> Option<Sc>;

    /// Replaces the constraint weight. Returns false for a fixed impact.
    ///
    /// Only valid while the terminal holds no matches.
    fn set_weight(&mut self, weight: Sc) -> bool;

    fn set_match_enabled(&mut self, enabled: bool);

    fn score(&self) -> Sc;

    fn match_count(&self) -> usize;

    /// Retained matches; empty when matching is disabled.
    fn matches(&self) -> Vec<DetailedConstraintMatch<Sc>>;

    fn analysis(&self) -> ConstraintAnalysis<Sc> {
        ConstraintAnalysis {
            constraint_ref: self.constraint_ref().clone(),
            impact_type: self.impact_type(),
            weight: self.weight(),
            score: self.score(),
            match_count: self.match_count(),
            matches: self.matches(),
        }
    }

    /// Recomputes the total from the per-match impacts.
    ///
    /// # Panics
    ///
    /// Panics if it differs from the running total.
    fn verify(&self);
}

impl<F, Sc> ConstraintScorer<Sc> for ScorerNode<F, Sc>
where
    F: Facts,
    Sc: Score,
{
    fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    fn impact_type(&self) -> ImpactType {
        self.impact_type
    }

    fn weight(&self) -> Option<Sc> {
        match &self.impact {
            MatchImpact::Weighted { weight, .. } => Some(*weight),
            MatchImpact::Fixed(_) => None,
        }
    }

    fn set_weight(&mut self, weight: Sc) -> bool {
        let MatchImpact::Weighted { weight: current, .. } = &mut self.impact else {
            return false;
        };
        assert!(
            self.matches.is_empty(),
            "{}: weight changed while matches are live",
            self.constraint_ref
        );
        *current = weight;
        true
    }

    fn set_match_enabled(&mut self, enabled: bool) {
        self.match_enabled = enabled;
    }

    fn score(&self) -> Sc {
        self.total
    }

    fn match_count(&self) -> usize {
        self.matches.len()
    }

    fn matches(&self) -> Vec<DetailedConstraintMatch<Sc>> {
        self.matches
            .iter()
            .filter_map(|(&id, m)| {
                m.facts.as_ref().map(|facts| DetailedConstraintMatch {
                    constraint_ref: self.constraint_ref.clone(),
                    tuple: id,
                    score: m.impact,
                    justification: ConstraintJustification::new(facts.entity_refs()),
                })
            })
            .collect()
    }

    fn verify(&self) {
        let recomputed = self
            .matches
            .values()
            .fold(Sc::zero(), |total, m| total + m.impact);
        assert_eq!(
            recomputed, self.total,
            "{}: score drifted from its matches",
            self.constraint_ref
        );
    }
}
