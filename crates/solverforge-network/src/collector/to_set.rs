//! Set collector.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;

use super::{Accumulator, Collector};
use crate::tuple::Fact;

/// Creates a collector of the distinct extracted values of a group.
///
/// A value leaves the set when its last occurrence is retracted.
///
/// ```
/// use solverforge_network::collector::{to_set, Accumulator, Collector};
///
/// let collector = to_set(|(room,): &(&'static str,)| *room);
/// let mut acc = collector.create_accumulator();
/// for room in ["A", "B", "A"] {
///     acc.accumulate(&collector.extract(&(room,)));
/// }
/// acc.retract(&"A");
/// assert_eq!(acc.finish().len(), 2);
/// acc.retract(&"A");
/// assert!(!acc.finish().contains(&"A"));
/// ```
pub fn to_set<F, V, M>(mapper: M) -> ToSetCollector<F, V, M>
where
    F: 'static,
    V: Fact + Eq + Hash,
    M: Fn(&F) -> V + 'static,
{
    ToSetCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct ToSetCollector<F, V, M> {
    mapper: M,
    _phantom: PhantomData<fn(&F) -> V>,
}

impl<F, V, M> Collector<F> for ToSetCollector<F, V, M>
where
    F: 'static,
    V: Fact + Eq + Hash,
    M: Fn(&F) -> V + 'static,
{
    type Value = V;
    type Result = HashSet<V>;
    type Accumulator = ToSetAccumulator<V>;

    #[inline]
    fn extract(&self, facts: &F) -> V {
        (self.mapper)(facts)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        ToSetAccumulator {
            occurrences: HashMap::new(),
        }
    }
}

pub struct ToSetAccumulator<V> {
    occurrences: HashMap<V, usize>,
}

impl<V: Eq + Hash + Clone> Accumulator<V, HashSet<V>> for ToSetAccumulator<V> {
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

    fn finish(&self) -> HashSet<V> {
        self.occurrences.keys().cloned().collect()
    }

    fn reset(&mut self) {
        self.occurrences.clear();
    }
}
