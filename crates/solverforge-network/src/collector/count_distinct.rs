//! Count of distinct extracted values.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use super::{Accumulator, Collector};

/// Creates a collector counting distinct values of `mapper` within a group.
///
/// ```
/// use solverforge_network::collector::{count_distinct, Accumulator, Collector};
///
/// let collector = count_distinct(|(day,): &(u8,)| *day);
/// let mut acc = collector.create_accumulator();
/// for day in [1, 2, 1] {
///     acc.accumulate(&collector.extract(&(day,)));
/// }
/// assert_eq!(acc.finish(), 2);
/// acc.retract(&1);
/// assert_eq!(acc.finish(), 2);
/// acc.retract(&1);
/// assert_eq!(acc.finish(), 1);
/// ```
pub fn count_distinct<F, V, M>(mapper: M) -> CountDistinctCollector<F, V, M>
where
    F: 'static,
    V: Eq + Hash + Clone + 'static,
    M: Fn(&F) -> V + 'static,
{
    CountDistinctCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct CountDistinctCollector<F, V, M> {
    mapper: M,
    _phantom: PhantomData<fn(&F) -> V>,
}

impl<F, V, M> Collector<F> for CountDistinctCollector<F, V, M>
where
    F: 'static,
    V: Eq + Hash + Clone + 'static,
    M: Fn(&F) -> V + 'static,
{
    type Value = V;
    type Result = usize;
    type Accumulator = CountDistinctAccumulator<V>;

    #[inline]
    fn extract(&self, facts: &F) -> V {
        (self.mapper)(facts)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        CountDistinctAccumulator {
            occurrences: HashMap::new(),
        }
    }
}

pub struct CountDistinctAccumulator<V> {
    occurrences: HashMap<V, usize>,
}

impl<V: Eq + Hash + Clone> Accumulator<V, usize> for CountDistinctAccumulator<V> {
    fn accumulate(&mut self, value: &V) {
        *self.occurrences.entry(value.clone()).or_insert(0) += 1;
    }

    fn retract(&mut self, value: &V) {
        if let Some(n) = self.occurrences.get_mut(value) {
            *n -= 1;
            if *n == 0 {
                self.occurrences.remove(value);
            }
        }
    }

    fn finish(&self) -> usize {
        self.occurrences.len()
    }

    fn reset(&mut self) {
        self.occurrences.clear();
    }
}
