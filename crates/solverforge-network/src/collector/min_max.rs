//! Min and max collectors.
//!
//! Both keep the multiset of a group's values in a `BTreeMap`, so
//! retracting the current extreme falls back to the next one exactly.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use super::{Accumulator, Collector};
use crate::tuple::Fact;

/// Creates a collector of the smallest extracted value; `None` for no values.
///
/// ```
/// use solverforge_network::collector::{min, Accumulator, Collector};
///
/// let collector = min(|(x,): &(i32,)| *x);
/// let mut acc = collector.create_accumulator();
/// acc.accumulate(&4);
/// acc.accumulate(&2);
/// acc.accumulate(&2);
/// assert_eq!(acc.finish(), Some(2));
/// acc.retract(&2);
/// assert_eq!(acc.finish(), Some(2));
/// acc.retract(&2);
/// assert_eq!(acc.finish(), Some(4));
/// ```
pub fn min<F, V, M>(mapper: M) -> MinCollector<F, V, M>
where
    F: 'static,
    V: Fact + Ord + PartialEq,
    M: Fn(&F) -> V + 'static,
{
    MinCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Creates a collector of the largest extracted value; `None` for no values.
pub fn max<F, V, M>(mapper: M) -> MaxCollector<F, V, M>
where
    F: 'static,
    V: Fact + Ord + PartialEq,
    M: Fn(&F) -> V + 'static,
{
    MaxCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct MinCollector<F, V, M> {
    mapper: M,
    _phantom: PhantomData<fn(&F) -> V>,
}

pub struct MaxCollector<F, V, M> {
    mapper: M,
    _phantom: PhantomData<fn(&F) -> V>,
}

macro_rules! impl_ordered_collector {
    ($collector:ident, $largest:literal) => {
        impl<F, V, M> Collector<F> for $collector<F, V, M>
        where
            F: 'static,
            V: Fact + Ord + PartialEq,
            M: Fn(&F) -> V + 'static,
        {
            type Value = V;
            type Result = Option<V>;
            type Accumulator = OrderedAccumulator<V>;

            #[inline]
            fn extract(&self, facts: &F) -> V {
                (self.mapper)(facts)
            }

            fn create_accumulator(&self) -> Self::Accumulator {
                OrderedAccumulator {
                    values: BTreeMap::new(),
                    largest: $largest,
                }
            }
        }
    };
}

impl_ordered_collector!(MinCollector, false);
impl_ordered_collector!(MaxCollector, true);

/// Multiset of values reporting either its first or its last element.
pub struct OrderedAccumulator<V> {
    values: BTreeMap<V, usize>,
    largest: bool,
}

impl<V: Ord + Clone> Accumulator<V, Option<V>> for OrderedAccumulator<V> {
    fn accumulate(&mut self, value: &V) {
        *self.values.entry(value.clone()).or_insert(0) += 1;
    }

    fn retract(&mut self, value: &V) {
        if let Some(n) = self.values.get_mut(value) {
            *n -= 1;
            if *n == 0 {
                self.values.remove(value);
            }
        }
    }

    fn finish(&self) -> Option<V> {
        let entry = if self.largest {
            self.values.last_key_value()
        } else {
            self.values.first_key_value()
        };
        entry.map(|(value, _)| value.clone())
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}
