//! List collector.

use std::marker::PhantomData;

use super::{Accumulator, Collector};
use crate::tuple::Fact;

/// Creates a collector of every extracted value, in accumulation order.
///
/// Retraction removes the earliest equal value.
pub fn to_list<F, V, M>(mapper: M) -> ToListCollector<F, V, M>
where
    F: 'static,
    V: Fact + PartialEq,
    M: Fn(&F) -> V + 'static,
{
    ToListCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct ToListCollector<F, V, M> {
    mapper: M,
    _phantom: PhantomData<fn(&F) -> V>,
}

impl<F, V, M> Collector<F> for ToListCollector<F, V, M>
where
    F: 'static,
    V: Fact + PartialEq,
    M: Fn(&F) -> V + 'static,
{
    type Value = V;
    type Result = Vec<V>;
    type Accumulator = ToListAccumulator<V>;

    #[inline]
    fn extract(&self, facts: &F) -> V {
        (self.mapper)(facts)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        ToListAccumulator { values: Vec::new() }
    }
}

pub struct ToListAccumulator<V> {
    values: Vec<V>,
}

impl<V: Clone + PartialEq> Accumulator<V, Vec<V>> for ToListAccumulator<V> {
    fn accumulate(&mut self, value: &V) {
        self.values.push(value.clone());
    }

    fn retract(&mut self, value: &V) {
        if let Some(pos) = self.values.iter().position(|v| v == value) {
            self.values.remove(pos);
        }
    }

    fn finish(&self) -> Vec<V> {
        self.values.clone()
    }

    fn reset(&mut self) {
        self.values.clear();
    }
}
