use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{apply, sorted};
use crate::node::{FlattenNode, NetworkNode, Source, UniInput};
use crate::test_utils::{uni, Event, RecordingLifecycle};
use crate::tuple::TupleId;

type Values = (Vec<i32>,);

fn values((values,): &Values) -> Vec<i32> {
    values.clone()
}

fn single(_: &Values, value: &i32) -> (i32,) {
    (*value,)
}

type Node = FlattenNode<Values, i32, Vec<i32>, (i32,), fn(&Values) -> Vec<i32>, fn(&Values, &i32) -> (i32,)>;

fn node() -> (Node, RecordingLifecycle<(i32,)>) {
    let mut node: Node = FlattenNode::new(
        values as fn(&Values) -> Vec<i32>,
        single as fn(&Values, &i32) -> (i32,),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));
    (node, recorder)
}

fn out(raw: u64) -> TupleId {
    TupleId::new(raw)
}

#[test]
fn test_calls_only_stage_until_flush() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut node = FlattenNode::new(
        move |(values,): &Values| {
            counter.set(counter.get() + 1);
            values.clone()
        },
        |_: &Values, value: &i32| (*value,),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));

    node.input().stage_insert(&uni(0, vec![1, 2]));
    node.input().stage_update(&uni(0, vec![1, 2, 3]));
    assert_eq!(calls.get(), 0);
    assert!(recorder.events().is_empty());
    assert!(!node.is_settled());

    let emitted = node.flush();
    assert_eq!(calls.get(), 1);
    assert_eq!(emitted.inserts, 3);
    assert_eq!(recorder.take().len(), 3);
    assert!(node.is_settled());
}

#[test]
fn test_insert_then_retract_before_flush_is_invisible() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mut node = FlattenNode::new(
        move |(values,): &Values| {
            counter.set(counter.get() + 1);
            values.clone()
        },
        |_: &Values, value: &i32| (*value,),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));

    node.input().stage_insert(&uni(0, vec![1, 2]));
    node.input().stage_retract(TupleId::new(0));

    assert!(node.flush().is_empty());
    assert_eq!(calls.get(), 0);
    assert!(recorder.events().is_empty());
}

#[test]
fn test_insert_emits_one_tuple_per_value() {
    let (mut node, recorder) = node();
    node.input().stage_insert(&uni(0, vec![1, 2, 2]));
    node.flush();

    assert_eq!(
        recorder.take(),
        vec![
            Event::Insert(out(0), (1,)),
            Event::Insert(out(1), (2,)),
            Event::Insert(out(2), (2,)),
        ]
    );
}

#[test]
fn test_update_diffs_value_multisets() {
    let (mut node, recorder) = node();
    node.input().stage_insert(&uni(0, vec![1, 2, 2]));
    node.flush();
    recorder.take();

    node.input().stage_update(&uni(0, vec![2, 3]));
    let emitted = node.flush();

    // 2: one of two handles reused, 1: gone, 3: new.
    assert_eq!((emitted.inserts, emitted.updates, emitted.retracts), (1, 1, 2));
    assert_eq!(
        recorder.take(),
        vec![
            Event::Update(out(1), (2,)),
            Event::Insert(out(3), (3,)),
            Event::Retract(out(0)),
            Event::Retract(out(2)),
        ]
    );
    assert_eq!(
        node.materialized(TupleId::new(0)),
        vec![(2, out(1)), (3, out(3))]
    );
}

#[test]
fn test_update_with_same_values_updates_in_place() {
    let (mut node, recorder) = node();
    node.input().stage_insert(&uni(0, vec![5, 5]));
    node.flush();
    recorder.take();

    node.input().stage_update(&uni(0, vec![5, 5]));
    node.flush();
    assert_eq!(
        recorder.take(),
        vec![Event::Update(out(0), (5,)), Event::Update(out(1), (5,))]
    );
}

#[test]
fn test_reordered_values_reuse_every_handle() {
    let (mut node, recorder) = node();
    node.input().stage_insert(&uni(0, vec![1, 2]));
    node.flush();
    recorder.take();

    node.input().stage_update(&uni(0, vec![2, 1]));
    let emitted = node.flush();
    assert_eq!((emitted.inserts, emitted.updates, emitted.retracts), (0, 2, 0));
    assert_eq!(
        node.materialized(TupleId::new(0)),
        vec![(2, out(1)), (1, out(0))]
    );
}

#[test]
fn test_retract_removes_every_materialized_tuple() {
    let (mut node, recorder) = node();
    node.input().stage_insert(&uni(0, vec![1, 2, 3]));
    node.flush();
    recorder.take();

    node.input().stage_retract(TupleId::new(0));
    let emitted = node.flush();
    assert_eq!(emitted.retracts, 3);
    assert!(node.materialized(TupleId::new(0)).is_empty());
}

#[test]
fn test_empty_flush_emits_nothing() {
    let (mut node, recorder) = node();
    node.input().stage_insert(&uni(0, vec![1]));
    node.flush();
    recorder.take();

    assert!(node.flush().is_empty());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_random_updates_keep_outputs_equal_to_mapping() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let (mut node, recorder) = node();
    let mut alive = HashMap::new();
    let mut sources: HashMap<u64, Vec<i32>> = HashMap::new();
    // Retracted this flush; their ids come back after it.
    let mut retired = HashSet::new();

    for step in 0..300 {
        let id = rng.random_range(0..6u64);
        let values: Vec<i32> = (0..rng.random_range(0..5))
            .map(|_| rng.random_range(0..4))
            .collect();
        if retired.contains(&id) {
            // Back after the next flush.
        } else if !sources.contains_key(&id) {
            node.input().stage_insert(&uni(id, values.clone()));
            sources.insert(id, values);
        } else if rng.random_bool(0.2) {
            node.input().stage_retract(TupleId::new(id));
            sources.remove(&id);
            retired.insert(id);
        } else {
            node.input().stage_update(&uni(id, values.clone()));
            sources.insert(id, values);
        }
        if step % 3 == 0 {
            node.flush();
            retired.clear();
            apply(&mut alive, recorder.take());

            let mut expected: Vec<(i32,)> = sources
                .values()
                .flat_map(|values| values.iter().map(|v| (*v,)))
                .collect();
            expected.sort();
            assert_eq!(sorted(&alive), expected, "step {}", step);
        }
    }
}

type Letters = (Vec<char>,);

type LetterNode = FlattenNode<
    Letters,
    char,
    Vec<char>,
    (char,),
    fn(&Letters) -> Vec<char>,
    fn(&Letters, &char) -> (char,),
>;

fn letters((letters,): &Letters) -> Vec<char> {
    letters.clone()
}

fn letter(_: &Letters, value: &char) -> (char,) {
    (*value,)
}

fn letter_node() -> (LetterNode, RecordingLifecycle<(char,)>) {
    let mut node: LetterNode = FlattenNode::new(
        letters as fn(&Letters) -> Vec<char>,
        letter as fn(&Letters, &char) -> (char,),
    );
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));
    (node, recorder)
}

fn letter_tuple(id: u64, values: &str) -> crate::tuple::Tuple<Letters> {
    uni(id, values.chars().collect())
}

#[test]
fn test_retracting_sources_retracts_only_their_outputs() {
    let (mut node, recorder) = letter_node();
    let mut alive = HashMap::new();

    node.input().stage_insert(&letter_tuple(1, "AB"));
    node.input().stage_insert(&letter_tuple(2, "BC"));
    let emitted = node.flush();
    assert_eq!((emitted.inserts, emitted.retracts), (4, 0));
    apply(&mut alive, recorder.take());
    assert_eq!(sorted(&alive), vec![('A',), ('B',), ('B',), ('C',)]);
    let from_second: HashSet<TupleId> = node
        .materialized(TupleId::new(2))
        .into_iter()
        .map(|(_, id)| id)
        .collect();

    node.input().stage_retract(TupleId::new(1));
    let emitted = node.flush();
    assert_eq!((emitted.inserts, emitted.updates, emitted.retracts), (0, 0, 2));
    apply(&mut alive, recorder.take());
    assert_eq!(sorted(&alive), vec![('B',), ('C',)]);
    let still_alive: HashSet<TupleId> = alive.keys().copied().collect();
    assert_eq!(still_alive, from_second);

    node.input().stage_retract(TupleId::new(2));
    let emitted = node.flush();
    assert_eq!(emitted.retracts, 2);
    apply(&mut alive, recorder.take());
    assert!(alive.is_empty());

    assert!(node.flush().is_empty());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_update_to_repeated_values() {
    let (mut node, recorder) = letter_node();
    node.input().stage_insert(&letter_tuple(0, "AB"));
    node.flush();
    recorder.take();

    node.input().stage_update(&letter_tuple(0, "BXB"));
    let emitted = node.flush();
    assert_eq!((emitted.inserts, emitted.updates, emitted.retracts), (2, 1, 1));

    let mut inserted = Vec::new();
    let mut updated = Vec::new();
    let mut retracted = Vec::new();
    for event in recorder.take() {
        match event {
            Event::Insert(_, (value,)) => inserted.push(value),
            Event::Update(_, (value,)) => updated.push(value),
            Event::Retract(id) => retracted.push(id),
        }
    }
    inserted.sort();
    assert_eq!(inserted, vec!['B', 'X']);
    assert_eq!(updated, vec!['B']);
    // The handle that carried 'A'.
    assert_eq!(retracted, vec![out(0)]);
}
