//! Equality joiners, indexed with hash maps.

use std::sync::Arc;

use super::{Extractor, IndexKey, Joiner, JoinerComparison, JoinerLevel};

/// Creates a self-join joiner matching when both sides extract the same key.
///
/// The left side is the uni fact group `(A,)`, the right side a single `A`.
/// Both sides share one extractor.
///
/// ```
/// use solverforge_network::joiner::equal;
///
/// let same_digit = equal(|x: &i32| *x % 10);
/// assert!(same_digit.matches(&(15,), &25));
/// assert!(!same_digit.matches(&(15,), &26));
/// ```
pub fn equal<A, K, F>(key: F) -> Joiner<(A,), A>
where
    A: 'static,
    K: Into<IndexKey>,
    F: Fn(&A) -> K + Send + Sync + 'static,
{
    let key = Arc::new(key);
    let right_key = Arc::clone(&key);
    let left: Extractor<(A,)> = Arc::new(move |(a,): &(A,)| -> IndexKey { (*key)(a).into() });
    let right: Extractor<A> = Arc::new(move |a: &A| -> IndexKey { (*right_key)(a).into() });
    Joiner::from_level(JoinerLevel::from_extractors(
        left,
        JoinerComparison::Equal,
        right,
    ))
}

/// Creates a joiner matching when `left(l) == right(r)`.
///
/// ```
/// use solverforge_network::joiner::equal_bi;
///
/// let j = equal_bi(|(a, b): &(i32, i32)| a + b, |c: &i64| *c);
/// assert!(j.matches(&(1, 2), &3));
/// ```
pub fn equal_bi<L, R, Kl, Kr, Fl, Fr>(left: Fl, right: Fr) -> Joiner<L, R>
where
    L: 'static,
    R: 'static,
    Kl: Into<IndexKey>,
    Kr: Into<IndexKey>,
    Fl: Fn(&L) -> Kl + Send + Sync + 'static,
    Fr: Fn(&R) -> Kr + Send + Sync + 'static,
{
    Joiner::from_level(JoinerLevel::new(left, JoinerComparison::Equal, right))
}
