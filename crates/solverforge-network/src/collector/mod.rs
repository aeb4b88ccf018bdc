// Collectors for group-by aggregation.
//
// A collector extracts one value per grouped tuple and folds the values of a
// group into a result. Accumulators must support exact retraction: the
// network removes a tuple's value with the same value it accumulated.

mod average;
mod conditionally;
mod count;
mod count_distinct;
mod min_max;
mod sum;
mod to_list;
mod to_set;


pub use average::{average, AverageAccumulator, AverageCollector};
pub use conditionally::{conditionally, ConditionalAccumulator, ConditionalCollector};
pub use count::{count, CountAccumulator, CountCollector};
pub use count_distinct::{count_distinct, CountDistinctAccumulator, CountDistinctCollector};
pub use min_max::{max, min, MaxCollector, MinCollector, OrderedAccumulator};
pub use sum::{sum, SumAccumulator, SumCollector};
pub use to_list::{to_list, ToListAccumulator, ToListCollector};
pub use to_set::{to_set, ToSetAccumulator, ToSetCollector};

use crate::tuple::Fact;

/// Aggregation over the fact groups `F` of one group.
pub trait Collector<F>: 'static {
    /// Value extracted from each tuple.
    type Value: 'static;

    /// Aggregated result emitted downstream.
    type Result: Fact + PartialEq;

    type Accumulator: Accumulator<Self::Value, Self::Result> + 'static;

    fn extract(&self, facts: &F) -> Self::Value;

    fn create_accumulator(&self) -> Self::Accumulator;
}

/// Incremental fold of extracted values.
pub trait Accumulator<V, R> {
    fn accumulate(&mut self, value: &V);

    fn retract(&mut self, value: &V);

    fn finish(&self) -> R;

    fn reset(&mut self);
}
