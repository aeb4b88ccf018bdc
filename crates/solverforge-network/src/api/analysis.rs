//! Score analysis: per-constraint breakdown, matches and indictments.
//!
//! Matches are only retained by terminals when constraint matching is
//! enabled; otherwise an analysis still carries scores and counts.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use solverforge_core::{ConstraintRef, ImpactType, Score};

use crate::tuple::TupleId;

/// Reference to a fact involved in a constraint match.
///
/// The fact itself is type-erased so matches of different fact classes fit
/// in one collection.
#[derive(Clone)]
pub struct EntityRef {
    pub type_name: String,
    pub display: String,
    entity: Arc<dyn Any + Send + Sync>,
}

impl EntityRef {
    pub fn new<T: Clone + Debug + Send + Sync + 'static>(entity: &T) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            display: format!("{:?}", entity),
            entity: Arc::new(entity.clone()),
        }
    }

    /// Attempts to downcast to the concrete fact type.
    pub fn as_entity<T: 'static>(&self) -> Option<&T> {
        self.entity.downcast_ref::<T>()
    }

    /// Type name without its module path.
    pub fn short_type_name(&self) -> &str {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.type_name)
    }
}

impl Debug for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRef")
            .field("type", &self.short_type_name())
            .field("display", &self.display)
            .finish()
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.display == other.display
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.display.hash(state);
    }
}

/// The facts of one match, in tuple position order.
#[derive(Debug, Clone)]
pub struct ConstraintJustification {
    pub entities: Vec<EntityRef>,
    pub description: String,
}

impl ConstraintJustification {
    pub fn new(entities: Vec<EntityRef>) -> Self {
        let description = entities
            .iter()
            .map(|e| e.display.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            entities,
            description,
        }
    }
}

/// One live match of a terminal with its signed score impact.
#[derive(Debug, Clone)]
pub struct DetailedConstraintMatch<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    /// Id of the matched tuple on the terminal's input edge.
    pub tuple: TupleId,
    pub score: Sc,
    pub justification: ConstraintJustification,
}

/// Per-constraint breakdown.
#[derive(Debug, Clone)]
pub struct ConstraintAnalysis<Sc: Score> {
    pub constraint_ref: ConstraintRef,
    pub impact_type: ImpactType,
    /// `None` for constraints whose impact function returns the impact directly.
    pub weight: Option<Sc>,
    pub score: Sc,
    pub match_count: usize,
    /// Empty when constraint matching is disabled.
    pub matches: Vec<DetailedConstraintMatch<Sc>>,
}

impl<Sc: Score> ConstraintAnalysis<Sc> {
    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }
}

/// Total score with the breakdown of every constraint, in definition order.
#[derive(Debug, Clone)]
pub struct ScoreExplanation<Sc: Score> {
    pub score: Sc,
    pub constraint_analyses: Vec<ConstraintAnalysis<Sc>>,
}

impl<Sc: Score> ScoreExplanation<Sc> {
    pub fn new(score: Sc, constraint_analyses: Vec<ConstraintAnalysis<Sc>>) -> Self {
        Self {
            score,
            constraint_analyses,
        }
    }

    /// Looks up a constraint by its full name.
    pub fn constraint(&self, full_name: &str) -> Option<&ConstraintAnalysis<Sc>> {
        self.constraint_analyses
            .iter()
            .find(|a| a.constraint_ref.full_name() == full_name)
    }

    pub fn total_match_count(&self) -> usize {
        self.constraint_analyses.iter().map(|a| a.match_count).sum()
    }

    pub fn non_zero_constraints(&self) -> Vec<&ConstraintAnalysis<Sc>> {
        self.constraint_analyses
            .iter()
            .filter(|a| !a.score.is_zero())
            .collect()
    }

    pub fn all_matches(&self) -> Vec<&DetailedConstraintMatch<Sc>> {
        self.constraint_analyses
            .iter()
            .flat_map(|a| &a.matches)
            .collect()
    }
}

/// How a single fact impacts the score.
#[derive(Debug, Clone)]
pub struct Indictment<Sc: Score> {
    pub entity: EntityRef,
    pub score: Sc,
    pub constraint_matches: HashMap<ConstraintRef, Vec<DetailedConstraintMatch<Sc>>>,
}

impl<Sc: Score> Indictment<Sc> {
    pub fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            score: Sc::zero(),
            constraint_matches: HashMap::new(),
        }
    }

    pub fn add_match(&mut self, constraint_match: DetailedConstraintMatch<Sc>) {
        self.score = self.score + constraint_match.score;
        self.constraint_matches
            .entry(constraint_match.constraint_ref.clone())
            .or_default()
            .push(constraint_match);
    }

    pub fn match_count(&self) -> usize {
        self.constraint_matches.values().map(Vec::len).sum()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraint_matches.len()
    }
}

/// Indictments keyed by fact.
#[derive(Debug, Clone)]
pub struct IndictmentMap<Sc: Score> {
    pub indictments: HashMap<EntityRef, Indictment<Sc>>,
}

impl<Sc: Score> IndictmentMap<Sc> {
    pub fn new() -> Self {
        Self {
            indictments: HashMap::new(),
        }
    }

    /// Charges every match to each fact it involves.
    pub fn from_explanation(explanation: &ScoreExplanation<Sc>) -> Self {
        let mut map = Self::new();
        for m in explanation.all_matches() {
            for entity in &m.justification.entities {
                map.indictments
                    .entry(entity.clone())
                    .or_insert_with(|| Indictment::new(entity.clone()))
                    .add_match(m.clone());
            }
        }
        map
    }

    pub fn get(&self, entity: &EntityRef) -> Option<&Indictment<Sc>> {
        self.indictments.get(entity)
    }

    /// Facts sorted by score impact, worst first.
    pub fn worst_entities(&self) -> Vec<&EntityRef> {
        let mut entities: Vec<_> = self.indictments.keys().collect();
        entities.sort_by(|a, b| {
            let score_a = self.indictments[*a].score;
            let score_b = self.indictments[*b].score;
            score_a.cmp(&score_b).then_with(|| a.display.cmp(&b.display))
        });
        entities
    }

    pub fn len(&self) -> usize {
        self.indictments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indictments.is_empty()
    }
}

impl<Sc: Score> Default for IndictmentMap<Sc> {
    fn default() -> Self {
        Self::new()
    }
}
