//! Counting, averaging and percentage helpers shared by every page's stats

use std::hash::Hash;

use indexmap::IndexMap;

/// Round to `decimals` places, halves rounding towards positive infinity
#[must_use]
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// `count / total * 100` rounded to one decimal place
///
/// An empty population has a rate of zero, never NaN.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_half_up(count as f64 / total as f64 * 100.0, 1)
}

/// Arithmetic mean, zero when there are no values
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Count records per key, keys in first-seen order
pub fn tally<'a, R, K, I, F>(records: I, key: F) -> IndexMap<K, usize>
where
    R: 'a + ?Sized,
    I: IntoIterator<Item = &'a R>,
    K: Hash + Eq,
    F: Fn(&R) -> K,
{
    let mut counts = IndexMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    counts
}

/// Sum a value per key, keys in first-seen order
pub fn sum_by<'a, R, K, I, F, V>(records: I, key: F, value: V) -> IndexMap<K, f64>
where
    R: 'a + ?Sized,
    I: IntoIterator<Item = &'a R>,
    K: Hash + Eq,
    F: Fn(&R) -> K,
    V: Fn(&R) -> f64,
{
    let mut sums = IndexMap::new();
    for record in records {
        *sums.entry(key(record)).or_insert(0.0) += value(record);
    }
    sums
}

/// Summary counters reduced from a record list
pub trait Aggregate: Sized {
    /// Record type being summarised
    type Record;

    /// Reduce the given records; must not depend on anything else
    fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Self::Record>,
        Self::Record: 'a;
}

/// Aggregate over anything that borrows as the record type, such as a derived view
pub fn compute_aggregate<A, T>(records: &[T]) -> A
where
    A: Aggregate,
    T: AsRef<A::Record>,
{
    A::aggregate(records.iter().map(AsRef::as_ref))
}
