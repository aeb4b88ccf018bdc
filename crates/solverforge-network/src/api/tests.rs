use solverforge_core::{ConstraintRef, HardSoftScore, ImpactType, SimpleScore};

use super::analysis::*;
use super::weight_overrides::ConstraintWeightOverrides;
use crate::tuple::TupleId;

#[derive(Clone, Debug, PartialEq)]
struct Room {
    id: i32,
    name: &'static str,
}

fn room(id: i32, name: &'static str) -> EntityRef {
    EntityRef::new(&Room { id, name })
}

fn detailed(constraint: &str, tuple: u64, score: i64, entities: Vec<EntityRef>) -> DetailedConstraintMatch<SimpleScore> {
    DetailedConstraintMatch {
        constraint_ref: ConstraintRef::parse(constraint),
        tuple: TupleId::new(tuple),
        score: SimpleScore::of(score),
        justification: ConstraintJustification::new(entities),
    }
}

fn analysis(constraint: &str, matches: Vec<DetailedConstraintMatch<SimpleScore>>) -> ConstraintAnalysis<SimpleScore> {
    let score = matches
        .iter()
        .fold(SimpleScore::ZERO, |total, m| total + m.score);
    ConstraintAnalysis {
        constraint_ref: ConstraintRef::parse(constraint),
        impact_type: ImpactType::Penalty,
        weight: Some(SimpleScore::ONE),
        score,
        match_count: matches.len(),
        matches,
    }
}

#[test]
fn test_entity_ref_downcast() {
    let entity = room(42, "Answer");
    let recovered: Option<&Room> = entity.as_entity();
    assert_eq!(recovered.map(|r| r.id), Some(42));
    assert!(entity.as_entity::<String>().is_none());
    assert_eq!(entity.short_type_name(), "Room");
}

#[test]
fn test_entity_ref_equality() {
    assert_eq!(room(1, "A"), room(1, "A"));
    assert_ne!(room(1, "A"), room(2, "B"));
}

#[test]
fn test_justification_description() {
    let just = ConstraintJustification::new(vec![room(1, "Alice"), room(2, "Bob")]);
    assert_eq!(just.entities.len(), 2);
    assert!(just.description.contains("Alice"));
    assert!(just.description.contains("Bob"));
}

#[test]
fn test_explanation_lookup_and_totals() {
    let explanation = ScoreExplanation::new(
        SimpleScore::of(-3),
        vec![
            analysis(
                "rooms/conflict",
                vec![
                    detailed("rooms/conflict", 0, -1, vec![room(1, "A")]),
                    detailed("rooms/conflict", 1, -2, vec![room(1, "A"), room(2, "B")]),
                ],
            ),
            analysis("rooms/unused", vec![]),
        ],
    );

    assert_eq!(explanation.total_match_count(), 2);
    assert_eq!(explanation.all_matches().len(), 2);
    assert_eq!(explanation.non_zero_constraints().len(), 1);
    let conflict = explanation.constraint("rooms/conflict");
    assert_eq!(conflict.map(|a| a.score), Some(SimpleScore::of(-3)));
    assert_eq!(conflict.map(|a| a.name()), Some("conflict"));
    assert!(explanation.constraint("unused").is_none());
}

#[test]
fn test_indictments_charge_each_involved_fact() {
    let explanation = ScoreExplanation::new(
        SimpleScore::of(-7),
        vec![
            analysis(
                "rooms/conflict",
                vec![
                    detailed("rooms/conflict", 0, -1, vec![room(1, "A")]),
                    detailed("rooms/conflict", 1, -2, vec![room(1, "A"), room(2, "B")]),
                ],
            ),
            analysis(
                "rooms/capacity",
                vec![detailed("rooms/capacity", 0, -4, vec![room(2, "B")])],
            ),
        ],
    );

    let map = IndictmentMap::from_explanation(&explanation);
    assert_eq!(map.len(), 2);

    let a = map.get(&room(1, "A")).map(|i| (i.score, i.match_count(), i.constraint_count()));
    assert_eq!(a, Some((SimpleScore::of(-3), 2, 1)));
    let b = map.get(&room(2, "B")).map(|i| (i.score, i.match_count(), i.constraint_count()));
    assert_eq!(b, Some((SimpleScore::of(-6), 2, 2)));

    let worst: Vec<&str> = map.worst_entities().iter().map(|e| e.display.as_str()).collect();
    assert!(worst[0].contains("\"B\""));
}

#[test]
fn test_empty_indictment_map() {
    let map = IndictmentMap::<SimpleScore>::default();
    assert!(map.is_empty());
    assert!(map.worst_entities().is_empty());
}

#[test]
fn test_overrides_put_and_get() {
    let mut overrides = ConstraintWeightOverrides::<SimpleScore>::new();
    assert!(overrides.is_empty());

    overrides.put("test", SimpleScore::of(5));
    assert_eq!(overrides.get("test"), Some(&SimpleScore::of(5)));
    assert_eq!(overrides.get("other"), None);
    overrides.put("test", SimpleScore::of(2));
    assert_eq!(overrides.get("test"), Some(&SimpleScore::of(2)));
    assert_eq!(overrides.len(), 1);
}

#[test]
fn test_overrides_from_pairs_and_names() {
    let overrides = ConstraintWeightOverrides::from_pairs([
        ("b", HardSoftScore::of_soft(2)),
        ("a", HardSoftScore::of_hard(1)),
        ("b", HardSoftScore::of_soft(3)),
    ]);
    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(overrides.get("b"), Some(&HardSoftScore::of_soft(3)));
}

#[test]
fn test_overrides_extend_replaces() {
    let mut base = ConstraintWeightOverrides::from_pairs([("a", SimpleScore::of(1))]);
    base.extend(ConstraintWeightOverrides::from_pairs([
        ("a", SimpleScore::of(3)),
        ("b", SimpleScore::of(4)),
    ]));
    assert_eq!(base.get("a"), Some(&SimpleScore::of(3)));
    assert_eq!(base.len(), 2);
}
