use crate::collector::{count, sum};
use crate::node::{GroupNode, KeyCollector, NetworkNode, Source, UniInput};
use crate::test_utils::{uni, Event, RecordingLifecycle};
use crate::tuple::{Tuple, TupleId};

type Sale = (&'static str, i64);

fn sale(id: u64, region: &'static str, amount: i64) -> Tuple<(Sale,)> {
    uni(id, (region, amount))
}

fn id(raw: u64) -> TupleId {
    TupleId::new(raw)
}

#[test]
fn test_group_birth_change_and_death() {
    let mut node = GroupNode::new(
        |(s,): &(Sale,)| s.0,
        sum(|(s,): &(Sale,)| s.1),
        |region: &&'static str, total: &i64| (*region, *total),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));

    node.input().stage_insert(&sale(0, "north", 5));
    node.input().stage_insert(&sale(1, "north", 7));
    node.flush();
    assert_eq!(recorder.take(), vec![Event::Insert(id(0), ("north", 12))]);

    node.input().stage_update(&sale(1, "north", 8));
    node.flush();
    assert_eq!(recorder.take(), vec![Event::Update(id(0), ("north", 13))]);

    node.input().stage_retract(id(0));
    node.input().stage_retract(id(1));
    node.flush();
    assert_eq!(recorder.take(), vec![Event::Retract(id(0))]);
    assert_eq!(node.group_count(), 0);
}

#[test]
fn test_unchanged_result_emits_nothing() {
    let mut node = GroupNode::new(
        |(s,): &(Sale,)| s.0,
        count::<(Sale,)>(),
        |region: &&'static str, n: &usize| (*region, *n),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));

    node.input().stage_insert(&sale(0, "north", 5));
    node.flush();
    recorder.take();

    // Same group, same count.
    node.input().stage_update(&sale(0, "north", 99));
    assert!(node.flush().is_empty());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_moving_between_groups() {
    let mut node = GroupNode::new(
        |(s,): &(Sale,)| s.0,
        count::<(Sale,)>(),
        |region: &&'static str, n: &usize| (*region, *n),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));

    node.input().stage_insert(&sale(0, "north", 1));
    node.input().stage_insert(&sale(1, "north", 1));
    node.flush();
    recorder.take();

    node.input().stage_update(&sale(1, "south", 1));
    node.flush();
    assert_eq!(
        recorder.take(),
        vec![
            Event::Update(id(0), ("north", 1)),
            Event::Insert(id(1), ("south", 1)),
        ]
    );
    assert_eq!(node.group_count(), 2);
}

#[test]
fn test_collapsed_updates_emit_final_state_only() {
    let mut node = GroupNode::new(
        |(s,): &(Sale,)| s.0,
        count::<(Sale,)>(),
        |region: &&'static str, n: &usize| (*region, *n),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));

    node.input().stage_insert(&sale(0, "north", 1));
    node.flush();
    recorder.take();

    node.input().stage_update(&sale(0, "south", 1));
    node.input().stage_update(&sale(0, "north", 2));
    node.flush();
    // Only the last update is staged, so "south" never exists.
    assert!(recorder.take().is_empty());
    assert_eq!(node.group_count(), 1);
}

#[test]
fn test_group_by_key_emits_distinct_keys() {
    let mut node = GroupNode::new(
        |(s,): &(Sale,)| s.0,
        KeyCollector::<(Sale,)>::new(),
        |region: &&'static str, _: &()| (*region,),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));

    node.input().stage_insert(&sale(0, "north", 1));
    node.input().stage_insert(&sale(1, "north", 2));
    node.input().stage_insert(&sale(2, "south", 3));
    node.flush();
    assert_eq!(
        recorder.take(),
        vec![Event::Insert(id(0), ("north",)), Event::Insert(id(1), ("south",))]
    );

    node.input().stage_retract(id(0));
    assert!(node.flush().is_empty());

    node.input().stage_retract(id(1));
    node.flush();
    assert_eq!(recorder.take(), vec![Event::Retract(id(0))]);
}
