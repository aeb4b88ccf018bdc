//! Filtering joiner for arbitrary pair predicates.

use std::sync::Arc;

use super::Joiner;

/// Creates a joiner from a predicate over the left group and the right fact.
///
/// Filters cannot be indexed; a join node tests them on every pair its
/// levels already matched.
///
/// ```
/// use solverforge_network::joiner::filtering;
///
/// let different = filtering(|(a,): &(i32,), b: &i32| a != b);
/// assert!(different.matches(&(1,), &2));
/// assert!(!different.matches(&(1,), &1));
/// ```
pub fn filtering<L, R, P>(predicate: P) -> Joiner<L, R>
where
    L: 'static,
    R: 'static,
    P: Fn(&L, &R) -> bool + Send + Sync + 'static,
{
    Joiner::from_filter(Arc::new(predicate))
}
