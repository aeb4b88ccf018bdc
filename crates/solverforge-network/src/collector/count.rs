//! Count collector.

use std::marker::PhantomData;

use super::{Accumulator, Collector};

/// Creates a collector that counts the tuples of a group.
///
/// # Example
///
/// ```
/// use solverforge_network::collector::{count, Accumulator, Collector};
///
/// let collector = count::<(i32,)>();
/// let mut acc = collector.create_accumulator();
///
/// acc.accumulate(&collector.extract(&(1,)));
/// acc.accumulate(&collector.extract(&(2,)));
/// acc.accumulate(&collector.extract(&(3,)));
/// assert_eq!(acc.finish(), 3);
///
/// acc.retract(&collector.extract(&(2,)));
/// assert_eq!(acc.finish(), 2);
/// ```
pub fn count<F: 'static>() -> CountCollector<F> {
    CountCollector {
        _phantom: PhantomData,
    }
}

pub struct CountCollector<F> {
    _phantom: PhantomData<fn(&F)>,
}

impl<F: 'static> Collector<F> for CountCollector<F> {
    type Value = ();
    type Result = usize;
    type Accumulator = CountAccumulator;

    #[inline]
    fn extract(&self, _facts: &F) {}

    fn create_accumulator(&self) -> Self::Accumulator {
        CountAccumulator { count: 0 }
    }
}

pub struct CountAccumulator {
    count: usize,
}

impl Accumulator<(), usize> for CountAccumulator {
    #[inline]
    fn accumulate(&mut self, _: &()) {
        self.count += 1;
    }

    #[inline]
    fn retract(&mut self, _: &()) {
        self.count -= 1;
    }

    #[inline]
    fn finish(&self) -> usize {
        self.count
    }

    #[inline]
    fn reset(&mut self) {
        self.count = 0;
    }
}
