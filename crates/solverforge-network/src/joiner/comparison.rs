//! Ordering joiners, indexed with sorted maps.

use super::{IndexKey, Joiner, JoinerComparison, JoinerLevel};

macro_rules! ordering_joiner {
    ($(#[$doc:meta])* $name:ident => $comparison:ident) => {
        $(#[$doc])*
        pub fn $name<L, R, Kl, Kr, Fl, Fr>(left: Fl, right: Fr) -> Joiner<L, R>
        where
            L: 'static,
            R: 'static,
            Kl: Into<IndexKey>,
            Kr: Into<IndexKey>,
            Fl: Fn(&L) -> Kl + Send + Sync + 'static,
            Fr: Fn(&R) -> Kr + Send + Sync + 'static,
        {
            Joiner::from_level(JoinerLevel::new(left, JoinerComparison::$comparison, right))
        }
    };
}

ordering_joiner!(
    /// Creates a joiner that matches when `left(l) < right(r)`.
    ///
    /// ```
    /// use solverforge_network::joiner::less_than;
    ///
    /// #[derive(Clone, Debug)]
    /// struct Task { start: i64, end: i64 }
    ///
    /// // The left task must end before the right one starts
    /// let sequential = less_than(|(t,): &(Task,)| t.end, |t: &Task| t.start);
    /// assert!(sequential.matches(&(Task { start: 0, end: 10 },), &Task { start: 15, end: 20 }));
    /// assert!(!sequential.matches(&(Task { start: 0, end: 10 },), &Task { start: 5, end: 20 }));
    /// ```
    less_than => LessThan
);

ordering_joiner!(
    /// Creates a joiner that matches when `left(l) <= right(r)`.
    less_than_or_equal => LessThanOrEqual
);

ordering_joiner!(
    /// Creates a joiner that matches when `left(l) > right(r)`.
    greater_than => GreaterThan
);

ordering_joiner!(
    /// Creates a joiner that matches when `left(l) >= right(r)`.
    greater_than_or_equal => GreaterThanOrEqual
);
