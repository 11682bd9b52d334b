//! Grouped running-sum aggregation.

use crate::domain::error::TaframeError;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::hash::Hash;

/// Calendar-day group key of each timestamp.
pub fn day_keys(index: &[NaiveDateTime]) -> Vec<NaiveDate> {
    index.iter().map(NaiveDateTime::date).collect()
}

/// Running `sum(numerator) / sum(denominator)` per group, in row order.
///
/// Each key keeps its own pair of sums, so a group restarts from zero the
/// first time its key appears regardless of where that row sits. Zero
/// running denominators follow IEEE division (NaN or infinity).
pub fn grouped_cumulative_ratio<K>(
    keys: &[K],
    numerator: &[f64],
    denominator: &[f64],
) -> Result<Vec<f64>, TaframeError>
where
    K: Eq + Hash + Copy,
{
    TaframeError::check_lengths("group keys/numerator", keys.len(), numerator.len())?;
    TaframeError::check_lengths("numerator/denominator", numerator.len(), denominator.len())?;

    let mut sums: HashMap<K, (f64, f64)> = HashMap::new();
    let ratio = keys
        .iter()
        .zip(numerator.iter().zip(denominator))
        .map(|(key, (&num, &den))| {
            let entry = sums.entry(*key).or_insert((0.0, 0.0));
            entry.0 += num;
            entry.1 += den;
            entry.0 / entry.1
        })
        .collect();
    Ok(ratio)
}
