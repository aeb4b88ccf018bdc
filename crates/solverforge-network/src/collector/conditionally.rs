//! Collector restricted to the tuples matching a predicate.

use std::marker::PhantomData;

use super::{Accumulator, Collector};

/// Wraps `collector` so only tuples passing `predicate` reach it.
///
/// Tuples that fail the predicate still belong to their group; they just
/// contribute nothing to the result.
///
/// ```
/// use solverforge_network::collector::{conditionally, count, Accumulator, Collector};
///
/// let night_shifts = conditionally(|(start,): &(u32,)| *start >= 22, count());
/// let mut acc = night_shifts.create_accumulator();
/// for start in [8, 22, 23] {
///     acc.accumulate(&night_shifts.extract(&(start,)));
/// }
/// assert_eq!(acc.finish(), 2);
/// ```
pub fn conditionally<F, P, C>(predicate: P, collector: C) -> ConditionalCollector<F, P, C>
where
    F: 'static,
    P: Fn(&F) -> bool + 'static,
    C: Collector<F>,
{
    ConditionalCollector {
        predicate,
        collector,
        _phantom: PhantomData,
    }
}

pub struct ConditionalCollector<F, P, C> {
    predicate: P,
    collector: C,
    _phantom: PhantomData<fn(&F)>,
}

impl<F, P, C> Collector<F> for ConditionalCollector<F, P, C>
where
    F: 'static,
    P: Fn(&F) -> bool + 'static,
    C: Collector<F>,
{
    type Value = Option<C::Value>;
    type Result = C::Result;
    type Accumulator = ConditionalAccumulator<C::Accumulator>;

    fn extract(&self, facts: &F) -> Option<C::Value> {
        if (self.predicate)(facts) {
            Some(self.collector.extract(facts))
        } else {
            None
        }
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        ConditionalAccumulator {
            inner: self.collector.create_accumulator(),
        }
    }
}

pub struct ConditionalAccumulator<A> {
    inner: A,
}

impl<V, R, A> Accumulator<Option<V>, R> for ConditionalAccumulator<A>
where
    A: Accumulator<V, R>,
{
    #[inline]
    fn accumulate(&mut self, value: &Option<V>) {
        if let Some(value) = value {
            self.inner.accumulate(value);
        }
    }

    #[inline]
    fn retract(&mut self, value: &Option<V>) {
        if let Some(value) = value {
            self.inner.retract(value);
        }
    }

    fn finish(&self) -> R {
        self.inner.finish()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}
