// Joiners for constraint stream joins and existence checks.
//
// A joiner is an ordered list of comparison levels plus an ordered list of
// filter predicates. Each level pairs a left extractor, a comparison and a
// right extractor; join nodes index both sides on the level keys, so only
// the filters run per candidate pair.
//
// # Self-joins
//
// Use [`equal()`] with a single extractor when both sides carry the same type:
//
// ```
// use solverforge_network::joiner::equal;
//
// #[derive(Clone, Debug)]
// struct Shift { employee_id: usize }
//
// let same_employee = equal(|s: &Shift| s.employee_id);
// assert!(same_employee.matches(&(Shift { employee_id: 1 },), &Shift { employee_id: 1 }));
// ```
//
// # Cross-joins
//
// Use [`equal_bi()`] between different types. The left extractor receives
// the whole left fact group:
//
// ```
// use solverforge_network::joiner::equal_bi;
//
// #[derive(Clone, Debug)]
// struct Employee { id: usize }
// #[derive(Clone, Debug)]
// struct Shift { employee_id: Option<usize> }
//
// let by_id = equal_bi(
//     |(shift,): &(Shift,)| shift.employee_id,
//     |emp: &Employee| Some(emp.id),
// );
// assert!(by_id.matches(&(Shift { employee_id: Some(2) },), &Employee { id: 2 }));
// ```

mod comparison;
mod equal;
mod filtering;
mod key;
mod overlapping;

#[cfg(test)]
mod tests;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use comparison::{greater_than, greater_than_or_equal, less_than, less_than_or_equal};
pub use equal::{equal, equal_bi};
pub use filtering::filtering;
pub use key::IndexKey;
pub use overlapping::overlapping;

use crate::error::NetworkError;

pub(crate) type Extractor<T> = Arc<dyn Fn(&T) -> IndexKey + Send + Sync>;
pub(crate) type Predicate<L, R> = Arc<dyn Fn(&L, &R) -> bool + Send + Sync>;

/// How a level compares the left key with the right key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinerComparison {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl JoinerComparison {
    /// Returns the comparison with both sides swapped: `a < b` iff `b > a`.
    pub fn flip(self) -> Self {
        match self {
            JoinerComparison::Equal => JoinerComparison::Equal,
            JoinerComparison::LessThan => JoinerComparison::GreaterThan,
            JoinerComparison::LessThanOrEqual => JoinerComparison::GreaterThanOrEqual,
            JoinerComparison::GreaterThan => JoinerComparison::LessThan,
            JoinerComparison::GreaterThanOrEqual => JoinerComparison::LessThanOrEqual,
        }
    }

    /// Tests `left <op> right`.
    #[inline]
    pub fn test(self, left: &IndexKey, right: &IndexKey) -> bool {
        match self {
            JoinerComparison::Equal => left == right,
            JoinerComparison::LessThan => left < right,
            JoinerComparison::LessThanOrEqual => left <= right,
            JoinerComparison::GreaterThan => left > right,
            JoinerComparison::GreaterThanOrEqual => left >= right,
        }
    }
}

/// One comparison level of a joiner.
pub struct JoinerLevel<L, R> {
    left: Extractor<L>,
    comparison: JoinerComparison,
    right: Extractor<R>,
}

impl<L: 'static, R: 'static> JoinerLevel<L, R> {
    pub fn new<Kl, Kr, Fl, Fr>(left: Fl, comparison: JoinerComparison, right: Fr) -> Self
    where
        Kl: Into<IndexKey>,
        Kr: Into<IndexKey>,
        Fl: Fn(&L) -> Kl + Send + Sync + 'static,
        Fr: Fn(&R) -> Kr + Send + Sync + 'static,
    {
        Self {
            left: Arc::new(move |l: &L| -> IndexKey { left(l).into() }),
            comparison,
            right: Arc::new(move |r: &R| -> IndexKey { right(r).into() }),
        }
    }
}

impl<L, R> JoinerLevel<L, R> {
    pub(crate) fn from_extractors(
        left: Extractor<L>,
        comparison: JoinerComparison,
        right: Extractor<R>,
    ) -> Self {
        Self {
            left,
            comparison,
            right,
        }
    }

    pub fn comparison(&self) -> JoinerComparison {
        self.comparison
    }

    #[inline]
    pub fn left_key(&self, left: &L) -> IndexKey {
        (self.left)(left)
    }

    #[inline]
    pub fn right_key(&self, right: &R) -> IndexKey {
        (self.right)(right)
    }

    #[inline]
    pub fn matches(&self, left: &L, right: &R) -> bool {
        self.comparison
            .test(&self.left_key(left), &self.right_key(right))
    }
}

impl<L, R> Clone for JoinerLevel<L, R> {
    fn clone(&self) -> Self {
        Self {
            left: Arc::clone(&self.left),
            comparison: self.comparison,
            right: Arc::clone(&self.right),
        }
    }
}

impl<L, R> PartialEq for JoinerLevel<L, R> {
    fn eq(&self, other: &Self) -> bool {
        self.comparison == other.comparison
            && Arc::ptr_eq(&self.left, &other.left)
            && Arc::ptr_eq(&self.right, &other.right)
    }
}

impl<L, R> Eq for JoinerLevel<L, R> {}

impl<L, R> Hash for JoinerLevel<L, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.comparison.hash(state);
        Arc::as_ptr(&self.left).cast::<()>().hash(state);
        Arc::as_ptr(&self.right).cast::<()>().hash(state);
    }
}

impl<L, R> fmt::Debug for JoinerLevel<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinerLevel")
            .field("comparison", &self.comparison)
            .finish_non_exhaustive()
    }
}

/// Matching condition between a left fact group `L` and a right fact `R`.
///
/// Immutable once built; clones share their extractors, so a clone compares
/// equal to the original.
pub struct Joiner<L, R> {
    levels: Vec<JoinerLevel<L, R>>,
    filters: Vec<Predicate<L, R>>,
}

impl<L, R> Joiner<L, R> {
    /// The joiner with no levels and no filters; it matches every pair.
    pub fn identity() -> Self {
        Self {
            levels: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Builds a joiner from an explicit level list.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::EmptyJoiner`] if `levels` is empty.
    pub fn from_levels(levels: Vec<JoinerLevel<L, R>>) -> Result<Self, NetworkError> {
        if levels.is_empty() {
            return Err(NetworkError::EmptyJoiner);
        }
        Ok(Self {
            levels,
            filters: Vec::new(),
        })
    }

    pub(crate) fn from_level(level: JoinerLevel<L, R>) -> Self {
        Self {
            levels: vec![level],
            filters: Vec::new(),
        }
    }

    pub(crate) fn from_filter(filter: Predicate<L, R>) -> Self {
        Self {
            levels: Vec::new(),
            filters: vec![filter],
        }
    }

    /// Conjunction: this joiner's levels then `other`'s, same for filters.
    pub fn and(mut self, other: Joiner<L, R>) -> Self {
        self.levels.extend(other.levels);
        self.filters.extend(other.filters);
        self
    }

    /// Folds a list of joiners with [`and`](Self::and).
    ///
    /// A single joiner is returned as is; an empty list yields
    /// [`identity`](Self::identity).
    pub fn merge(joiners: Vec<Joiner<L, R>>) -> Self {
        let mut joiners = joiners.into_iter();
        match joiners.next() {
            None => Self::identity(),
            Some(first) => joiners.fold(first, Joiner::and),
        }
    }

    /// Evaluates every level in order, then every filter, failing fast.
    pub fn matches(&self, left: &L, right: &R) -> bool {
        self.levels.iter().all(|level| level.matches(left, right)) && self.test_filters(left, right)
    }

    /// Evaluates only the filter predicates.
    #[inline]
    pub fn test_filters(&self, left: &L, right: &R) -> bool {
        self.filters.iter().all(|filter| filter(left, right))
    }

    pub fn levels(&self) -> &[JoinerLevel<L, R>] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn comparisons(&self) -> Vec<JoinerComparison> {
        self.levels.iter().map(JoinerLevel::comparison).collect()
    }

    pub fn left_keys(&self, left: &L) -> Vec<IndexKey> {
        self.levels.iter().map(|level| level.left_key(left)).collect()
    }

    pub fn right_keys(&self, right: &R) -> Vec<IndexKey> {
        self.levels.iter().map(|level| level.right_key(right)).collect()
    }
}

impl<L, R> Clone for Joiner<L, R> {
    fn clone(&self) -> Self {
        Self {
            levels: self.levels.clone(),
            filters: self.filters.clone(),
        }
    }
}

impl<L, R> Default for Joiner<L, R> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<L, R> PartialEq for Joiner<L, R> {
    fn eq(&self, other: &Self) -> bool {
        self.levels == other.levels
            && self.filters.len() == other.filters.len()
            && self
                .filters
                .iter()
                .zip(&other.filters)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl<L, R> Eq for Joiner<L, R> {}

impl<L, R> Hash for Joiner<L, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.levels.hash(state);
        for filter in &self.filters {
            Arc::as_ptr(filter).cast::<()>().hash(state);
        }
    }
}

impl<L, R> fmt::Debug for Joiner<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Joiner")
            .field("comparisons", &self.comparisons())
            .field("filters", &self.filters.len())
            .finish()
    }
}
