//! Overlapping joiner for interval overlap detection.

use super::{IndexKey, Joiner, JoinerComparison, JoinerLevel};

/// Creates a joiner that matches when two half-open intervals overlap.
///
/// `[start_l, end_l)` and `[start_r, end_r)` overlap iff
/// `start_l < end_r` and `end_l > start_r`. Both conditions become ordering
/// levels, so candidate pairs come from range queries.
///
/// ```
/// use solverforge_network::joiner::overlapping;
///
/// #[derive(Clone, Debug)]
/// struct Shift { start: i64, end: i64 }
///
/// let overlap = overlapping(
///     |(s,): &(Shift,)| s.start,
///     |(s,): &(Shift,)| s.end,
///     |s: &Shift| s.start,
///     |s: &Shift| s.end,
/// );
///
/// // [0, 10) and [5, 15) overlap at [5, 10)
/// assert!(overlap.matches(&(Shift { start: 0, end: 10 },), &Shift { start: 5, end: 15 }));
/// // [0, 10) and [10, 20) only touch
/// assert!(!overlap.matches(&(Shift { start: 0, end: 10 },), &Shift { start: 10, end: 20 }));
/// ```
pub fn overlapping<L, R, K, Fsl, Fel, Fsr, Fer>(
    start_left: Fsl,
    end_left: Fel,
    start_right: Fsr,
    end_right: Fer,
) -> Joiner<L, R>
where
    L: 'static,
    R: 'static,
    K: Into<IndexKey>,
    Fsl: Fn(&L) -> K + Send + Sync + 'static,
    Fel: Fn(&L) -> K + Send + Sync + 'static,
    Fsr: Fn(&R) -> K + Send + Sync + 'static,
    Fer: Fn(&R) -> K + Send + Sync + 'static,
{
    Joiner::from_level(JoinerLevel::new(
        start_left,
        JoinerComparison::LessThan,
        end_right,
    ))
    .and(Joiner::from_level(JoinerLevel::new(
        end_left,
        JoinerComparison::GreaterThan,
        start_right,
    )))
}
