// Average collector.
//
// The running sum stays in the value type, so integer and decimal sums
// retract exactly; only `finish` converts to `f64`.

use std::marker::PhantomData;
use std::ops::{Add, Sub};

use num_traits::{ToPrimitive, Zero};

use super::{Accumulator, Collector};

// Creates a collector of the mean of extracted values; `None` for no values.
//
// # Example
//
// ```
// use solverforge_network::collector::{average, Accumulator, Collector};
//
// let collector = average(|(minutes,): &(i64,)| *minutes);
// let mut acc = collector.create_accumulator();
// acc.accumulate(&collector.extract(&(30,)));
// acc.accumulate(&collector.extract(&(45,)));
// assert_eq!(acc.finish(), Some(37.5));
//
// acc.retract(&45);
// acc.retract(&30);
// assert_eq!(acc.finish(), None);
// ```
pub fn average<F, T, M>(mapper: M) -> AverageCollector<F, T, M>
where
    F: 'static,
    T: Clone + Zero + Add<Output = T> + Sub<Output = T> + ToPrimitive + 'static,
    M: Fn(&F) -> T + 'static,
{
    AverageCollector {
        mapper,
        _phantom: PhantomData,
    }
}

pub struct AverageCollector<F, T, M> {
    mapper: M,
    _phantom: PhantomData<fn(&F) -> T>,
}

impl<F, T, M> Collector<F> for AverageCollector<F, T, M>
where
    F: 'static,
    T: Clone + Zero + Add<Output = T> + Sub<Output = T> + ToPrimitive + 'static,
    M: Fn(&F) -> T + 'static,
{
    type Value = T;
    type Result = Option<f64>;
    type Accumulator = AverageAccumulator<T>;

    #[inline]
    fn extract(&self, facts: &F) -> T {
        (self.mapper)(facts)
    }

    fn create_accumulator(&self) -> Self::Accumulator {
        AverageAccumulator {
            sum: T::zero(),
            count: 0,
        }
    }
}

pub struct AverageAccumulator<T> {
    sum: T,
    count: usize,
}

impl<T> Accumulator<T, Option<f64>> for AverageAccumulator<T>
where
    T: Clone + Zero + Add<Output = T> + Sub<Output = T> + ToPrimitive,
{
    fn accumulate(&mut self, value: &T) {
        let current = std::mem::replace(&mut self.sum, T::zero());
        self.sum = current + value.clone();
        self.count += 1;
    }

    fn retract(&mut self, value: &T) {
        let current = std::mem::replace(&mut self.sum, T::zero());
        self.sum = current - value.clone();
        self.count -= 1;
    }

    fn finish(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        self.sum.to_f64().map(|sum| sum / self.count as f64)
    }

    fn reset(&mut self) {
        self.sum = T::zero();
        self.count = 0;
    }
}
