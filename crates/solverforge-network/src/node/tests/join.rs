use std::collections::{HashMap, HashSet};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{apply, sorted};
use crate::joiner::{equal_bi, filtering, greater_than_or_equal, less_than, Joiner};
use crate::node::{BiInput, JoinNode, NetworkNode, Source};
use crate::test_utils::{uni, Event, RecordingLifecycle};
use crate::tuple::{Tuple, TupleId};

fn last_digit() -> Joiner<(i32,), i32> {
    equal_bi(|(a,): &(i32,)| *a % 10, |b: &i32| *b % 10)
}

fn join_node(joiner: Joiner<(i32,), i32>) -> (JoinNode<(i32,), i32>, RecordingLifecycle<(i32, i32)>) {
    let mut node = JoinNode::new(joiner);
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));
    (node, recorder)
}

#[test]
fn test_insert_creates_one_output_per_match() {
    let (mut node, recorder) = join_node(last_digit());
    node.left_input().stage_insert(&uni(0, 11));
    node.left_input().stage_insert(&uni(1, 21));
    node.left_input().stage_insert(&uni(2, 22));
    node.right_input().stage_insert(&uni(0, 1));

    let emitted = node.flush();
    assert_eq!(emitted.inserts, 2);
    assert_eq!(node.match_count(), 2);

    let mut alive = HashMap::new();
    apply(&mut alive, recorder.take());
    assert_eq!(sorted(&alive), vec![(11, 1), (21, 1)]);
}

#[test]
fn test_right_update_moves_matches() {
    let (mut node, recorder) = join_node(last_digit());
    let mut alive = HashMap::new();
    node.left_input().stage_insert(&uni(0, 11));
    node.left_input().stage_insert(&uni(1, 22));
    node.right_input().stage_insert(&uni(0, 1));
    node.flush();
    apply(&mut alive, recorder.take());

    node.right_input().stage_update(&uni(0, 2));
    let emitted = node.flush();
    assert_eq!((emitted.inserts, emitted.retracts), (1, 1));
    apply(&mut alive, recorder.take());
    assert_eq!(sorted(&alive), vec![(22, 2)]);
}

#[test]
fn test_kept_pair_is_updated_with_new_facts() {
    let (mut node, recorder) = join_node(last_digit());
    node.left_input().stage_insert(&uni(0, 11));
    node.right_input().stage_insert(&uni(0, 1));
    node.flush();
    let out = match recorder.take().as_slice() {
        [Event::Insert(id, _)] => *id,
        other => panic!("unexpected events {:?}", other),
    };

    node.left_input().stage_update(&uni(0, 31));
    node.flush();
    assert_eq!(recorder.take(), vec![Event::Update(out, (31, 1))]);
}

#[test]
fn test_retract_removes_all_pairs_of_a_tuple() {
    let (mut node, recorder) = join_node(last_digit());
    node.left_input().stage_insert(&uni(0, 11));
    node.right_input().stage_insert(&uni(0, 1));
    node.right_input().stage_insert(&uni(1, 41));
    node.flush();
    recorder.take();

    node.left_input().stage_retract(TupleId::new(0));
    let emitted = node.flush();
    assert_eq!(emitted.retracts, 2);
    assert_eq!(node.match_count(), 0);
}

#[test]
fn test_pair_created_and_lost_in_one_flush_emits_nothing() {
    let (mut node, recorder) = join_node(last_digit());
    node.right_input().stage_insert(&uni(0, 1));
    node.flush();

    node.left_input().stage_insert(&uni(0, 11));
    node.right_input().stage_update(&uni(0, 2));
    assert!(node.flush().is_empty());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_filters_run_after_levels() {
    let joiner = last_digit().and(filtering(|(a,): &(i32,), b: &i32| a != b));
    let (mut node, recorder) = join_node(joiner);
    node.left_input().stage_insert(&uni(0, 1));
    node.left_input().stage_insert(&uni(1, 11));
    node.right_input().stage_insert(&uni(0, 1));
    node.flush();

    let mut alive = HashMap::new();
    apply(&mut alive, recorder.take());
    assert_eq!(sorted(&alive), vec![(11, 1)]);
}

#[test]
fn test_update_of_unchanged_pair_set_only_updates() {
    let (mut node, recorder) = join_node(last_digit());
    node.left_input().stage_insert(&uni(0, 11));
    node.right_input().stage_insert(&uni(0, 1));
    node.right_input().stage_insert(&uni(1, 21));
    node.flush();
    recorder.take();

    node.right_input().stage_update(&uni(1, 31));
    let emitted = node.flush();
    assert_eq!((emitted.inserts, emitted.updates, emitted.retracts), (0, 1, 0));
}

#[test]
fn test_bi_left_joins_into_tri_tuple() {
    let mut node: JoinNode<(i32, i32), i32> = JoinNode::new(equal_bi(
        |(a, b): &(i32, i32)| a + b,
        |c: &i32| *c,
    ));
    let recorder = RecordingLifecycle::new();
    node.connect(Box::new(recorder.clone()));
    node.left_input()
        .stage_insert(&Tuple::new(TupleId::new(0), (1, 2)));
    node.right_input().stage_insert(&uni(0, 3));
    node.right_input().stage_insert(&uni(1, 4));
    node.flush();

    let mut alive = HashMap::new();
    apply(&mut alive, recorder.take());
    assert_eq!(sorted(&alive), vec![(1, 2, 3)]);
}

fn random_history(joiner: Joiner<(i32,), i32>, matches: fn(i32, i32) -> bool, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (mut node, recorder) = join_node(joiner);
    let mut alive = HashMap::new();
    let mut lefts: HashMap<u64, i32> = HashMap::new();
    let mut rights: HashMap<u64, i32> = HashMap::new();
    let mut retired: HashSet<(bool, u64)> = HashSet::new();

    for step in 0..600 {
        let left = rng.random_bool(0.5);
        let id = rng.random_range(0..8u64);
        let value = rng.random_range(-10..10);
        let facts = if left { &mut lefts } else { &mut rights };
        let tuple = uni(id, value);

        if retired.contains(&(left, id)) {
            // Back after the next flush.
        } else if !facts.contains_key(&id) {
            facts.insert(id, value);
            if left {
                node.left_input().stage_insert(&tuple);
            } else {
                node.right_input().stage_insert(&tuple);
            }
        } else if rng.random_bool(0.25) {
            facts.remove(&id);
            retired.insert((left, id));
            if left {
                node.left_input().stage_retract(TupleId::new(id));
            } else {
                node.right_input().stage_retract(TupleId::new(id));
            }
        } else {
            facts.insert(id, value);
            if left {
                node.left_input().stage_update(&tuple);
            } else {
                node.right_input().stage_update(&tuple);
            }
        }

        if step % 5 == 4 {
            node.flush();
            retired.clear();
            apply(&mut alive, recorder.take());

            let mut expected = Vec::new();
            for a in lefts.values() {
                for b in rights.values() {
                    if matches(*a, *b) {
                        expected.push((*a, *b));
                    }
                }
            }
            expected.sort();
            assert_eq!(sorted(&alive), expected, "step {}", step);
        }
    }
}

#[test]
fn test_random_equal_join_agrees_with_brute_force() {
    random_history(
        equal_bi(|(a,): &(i32,)| a.rem_euclid(4), |b: &i32| b.rem_euclid(4)),
        |a, b| a.rem_euclid(4) == b.rem_euclid(4),
        1,
    );
}

#[test]
fn test_random_ordering_join_agrees_with_brute_force() {
    random_history(
        less_than(|(a,): &(i32,)| *a, |b: &i32| *b),
        |a, b| a < b,
        2,
    );
}

#[test]
fn test_random_mixed_join_agrees_with_brute_force() {
    let joiner = equal_bi(|(a,): &(i32,)| a.rem_euclid(3), |b: &i32| b.rem_euclid(3))
        .and(greater_than_or_equal(|(a,): &(i32,)| *a, |b: &i32| *b))
        .and(filtering(|(a,): &(i32,), b: &i32| (a + b) % 5 != 0));
    random_history(
        joiner,
        |a, b| a.rem_euclid(3) == b.rem_euclid(3) && a >= b && (a + b) % 5 != 0,
        3,
    );
}
