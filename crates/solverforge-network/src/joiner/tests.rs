use std::collections::HashSet;

use super::*;

#[derive(Clone, Debug)]
struct Shift {
    employee: u32,
    start: i64,
    end: i64,
}

fn shift(employee: u32, start: i64, end: i64) -> Shift {
    Shift {
        employee,
        start,
        end,
    }
}

#[test]
fn test_and_concatenates_levels_and_filters() {
    let joiner = equal(|s: &Shift| s.employee)
        .and(filtering(|(a,): &(Shift,), b: &Shift| a.start != b.start))
        .and(less_than(|(a,): &(Shift,)| a.start, |b: &Shift| b.end));

    assert_eq!(joiner.level_count(), 2);
    assert_eq!(joiner.filter_count(), 1);
    assert_eq!(
        joiner.comparisons(),
        vec![JoinerComparison::Equal, JoinerComparison::LessThan]
    );
    assert!(joiner.matches(&(shift(1, 0, 8),), &shift(1, 4, 12)));
    assert!(!joiner.matches(&(shift(1, 0, 8),), &shift(2, 4, 12)));
    assert!(!joiner.matches(&(shift(1, 4, 8),), &shift(1, 4, 12)));
}

#[test]
fn test_merge_edge_cases() {
    let empty: Joiner<(Shift,), Shift> = Joiner::merge(Vec::new());
    assert_eq!(empty.level_count(), 0);
    assert!(empty.matches(&(shift(1, 0, 1),), &shift(2, 5, 6)));
    assert_eq!(empty, Joiner::identity());

    let single = equal(|s: &Shift| s.employee);
    let copy = single.clone();
    assert_eq!(Joiner::merge(vec![single]), copy);
}

#[test]
fn test_merge_equals_chained_and() {
    let a = equal(|s: &Shift| s.employee);
    let b = less_than(|(l,): &(Shift,)| l.start, |r: &Shift| r.start);
    let c = filtering(|(l,): &(Shift,), r: &Shift| l.end <= r.end);

    let merged = Joiner::merge(vec![a.clone(), b.clone(), c.clone()]);
    let chained = a.and(b).and(c);
    assert_eq!(merged, chained);
}

#[test]
fn test_equality_is_structural() {
    let by_employee = equal(|s: &Shift| s.employee);
    let other = equal(|s: &Shift| s.employee);

    assert_eq!(by_employee.clone(), by_employee);
    // Same shape, different extractor instances.
    assert_ne!(by_employee, other);

    let mut set = HashSet::new();
    set.insert(by_employee.clone());
    set.insert(by_employee.clone());
    set.insert(other);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_order_matters_for_equality() {
    let a = equal(|s: &Shift| s.employee);
    let b = less_than(|(l,): &(Shift,)| l.start, |r: &Shift| r.end);
    assert_ne!(a.clone().and(b.clone()), b.and(a));
}

#[test]
fn test_matches_fails_fast_on_first_level() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let joiner = equal(|s: &Shift| s.employee).and(filtering(
        move |_: &(Shift,), _: &Shift| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        },
    ));

    assert!(!joiner.matches(&(shift(1, 0, 1),), &shift(2, 0, 1)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(joiner.matches(&(shift(1, 0, 1),), &shift(1, 0, 1)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_from_levels_rejects_empty() {
    let result: Result<Joiner<(Shift,), Shift>, _> = Joiner::from_levels(Vec::new());
    assert!(matches!(result, Err(NetworkError::EmptyJoiner)));

    let joiner = Joiner::from_levels(vec![JoinerLevel::new(
        |(l,): &(Shift,)| l.end,
        JoinerComparison::LessThanOrEqual,
        |r: &Shift| r.start,
    )])
    .unwrap();
    assert!(joiner.matches(&(shift(1, 0, 8),), &shift(1, 8, 16)));
}

#[test]
fn test_overlapping_levels() {
    let overlap = overlapping(
        |(s,): &(Shift,)| s.start,
        |(s,): &(Shift,)| s.end,
        |s: &Shift| s.start,
        |s: &Shift| s.end,
    );
    assert_eq!(
        overlap.comparisons(),
        vec![JoinerComparison::LessThan, JoinerComparison::GreaterThan]
    );
    assert!(overlap.matches(&(shift(1, 5, 15),), &shift(2, 0, 10)));
    assert!(!overlap.matches(&(shift(1, 10, 20),), &shift(2, 0, 10)));
}

#[test]
fn test_flip() {
    for comparison in [
        JoinerComparison::Equal,
        JoinerComparison::LessThan,
        JoinerComparison::LessThanOrEqual,
        JoinerComparison::GreaterThan,
        JoinerComparison::GreaterThanOrEqual,
    ] {
        assert_eq!(comparison.flip().flip(), comparison);
        for (a, b) in [(1i64, 2i64), (2, 2), (3, 2)] {
            let (ka, kb) = (IndexKey::from(a), IndexKey::from(b));
            assert_eq!(comparison.test(&ka, &kb), comparison.flip().test(&kb, &ka));
        }
    }
}

#[test]
fn test_and_of_two_comparisons_is_their_conjunction() {
    let starts_before = less_than(|(a,): &(Shift,)| a.start, |b: &Shift| b.start);
    let ends_after = greater_than_or_equal(|(a,): &(Shift,)| a.end, |b: &Shift| b.end);
    let both = starts_before.clone().and(ends_after.clone());
    assert_eq!(both.level_count(), 2);

    for a_start in 0..4 {
        for a_end in a_start..6 {
            for b_start in 0..4 {
                for b_end in b_start..6 {
                    let left = (shift(1, a_start, a_end),);
                    let right = shift(1, b_start, b_end);
                    assert_eq!(
                        both.matches(&left, &right),
                        starts_before.matches(&left, &right) && ends_after.matches(&left, &right)
                    );
                }
            }
        }
    }
}

#[test]
fn test_integer_keys_compare_across_widths() {
    let before = less_than(|(a,): &(i64,)| *a, |b: &u64| *b);
    assert!(!before.matches(&(5,), &3));
    assert!(before.matches(&(-1,), &0));
    assert!(before.matches(&(2,), &3));

    let same_slot = equal_bi(|(a,): &(i32,)| *a, |b: &usize| *b);
    assert!(same_slot.matches(&(4,), &4));
    assert!(!same_slot.matches(&(-4,), &4));

    assert_eq!(IndexKey::from(u64::MAX), IndexKey::Int(i128::from(u64::MAX)));
    assert!(IndexKey::from(i64::MIN) < IndexKey::from(0u8));
}
