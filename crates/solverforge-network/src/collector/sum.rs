// Sum collector over any additive group.
//
// Values only need `Zero + Add + Sub`, so integers, floats and decimals all
// work; retraction subtracts the value accumulated earlier.

use std::marker::PhantomData;
use std::ops::{Add, Sub};

use num_traits::Zero;

use super::{Accumulator, Collector};
use crate::tuple::Fact;

// Creates a collector that sums values extracted from each tuple.
//
// # Example
//
// ```
// use solverforge_network::collector::{sum, Accumulator, Collector};
//
// let collector = sum(|(hours,): &(i64,)| *hours);
// let mut acc = collector.create_accumulator();
//
// acc.accumulate(&collector.extract(&(5,)));
// acc.accumulate(&collector.extract(&(3,)));
// assert_eq!(acc.finish(), 8);
//
// acc.retract(&collector.extract(&(3,)));
// assert_eq!(acc.finish(), 5);
// ```
pub fn sum<F, T, M>(mapper: M) -> SumCollector<F, T, M>
where
    F: 'static,
    T: Fact + PartialEq + Zero + Add<Output = T> + Sub<Output = T>,
    M: Fn(&F) -> T + 'static,
{
    SumCollector {
        mapper,
        _phantom: PhantomData,
    }
}

// The mapper is stored once in the collector, not cloned into accumulators.
pub struct SumCollector<F, T, M> {
    mapper: M,
    _phantom: PhantomData<fn(&F) -> T>,
}

impl<F, T, M> Collector<F> for SumCollector<F, T, M>
where
    F: 'static,
    T: Fact + PartialEq + Zero + Add<Output = T> + Sub<Output = T>,
    M: Fn(&F) -> T + 'static,
{
    type Value = T;
    type Result = T;
    type Accumulator = SumAccumulator<T>;

    #[inline]
    fn extract(&self, facts: &F) -> T {
        (self.mapper)(facts)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        SumAccumulator { sum: T::zero() }
    }
}

pub struct SumAccumulator<T> {
    sum: T,
}

impl<T> Accumulator<T, T> for SumAccumulator<T>
where
    T: Clone + Zero + Add<Output = T> + Sub<Output = T>,
{
    #[inline]
    fn accumulate(&mut self, value: &T) {
        let current = std::mem::replace(&mut self.sum, T::zero());
        self.sum = current + value.clone();
    }

    #[inline]
    fn retract(&mut self, value: &T) {
        let current = std::mem::replace(&mut self.sum, T::zero());
        self.sum = current - value.clone();
    }

    #[inline]
    fn finish(&self) -> T {
        self.sum.clone()
    }

    #[inline]
    fn reset(&mut self) {
        self.sum = T::zero();
    }
}
