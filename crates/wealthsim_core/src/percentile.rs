//! Nearest-rank percentiles
//!
//! One convention is used everywhere: for `n` sorted values the `p`-th
//! percentile is the element at index `ceil(p / 100 * n) - 1`, clamped to
//! `[0, n - 1]`. No interpolation is performed, so every reported percentile
//! is an actual simulated value.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Percentiles reported for value bands
pub const BAND_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Percentiles reported for drawdown bands
pub const DRAWDOWN_PERCENTILES: [f64; 3] = [50.0, 75.0, 95.0];

/// Index of the `p`-th percentile in a sorted slice of length `n`
#[must_use]
pub fn nearest_rank_index(p: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    // p * n first keeps integer-valued products exact before dividing
    let rank = (p * n as f64 / 100.0).ceil();
    if rank.is_nan() || rank < 1.0 {
        0
    } else {
        (rank as usize - 1).min(n - 1)
    }
}

/// Percentile of an already sorted slice
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted[nearest_rank_index(p, sorted.len())])
}

/// Sort `values` in place and return its `p`-th percentile
pub fn percentile(values: &mut [f64], p: f64) -> Option<f64> {
    values.sort_unstable_by(f64::total_cmp);
    percentile_sorted(values, p)
}

/// Per-column percentiles of a row-major matrix.
///
/// Returns one series per requested percentile, each with `num_columns`
/// entries. Every series is empty when the matrix has no rows.
pub(crate) fn column_percentiles(
    values: &[f64],
    num_columns: usize,
    percentiles: &[f64],
) -> Vec<Vec<f64>> {
    if num_columns == 0 || values.is_empty() {
        return vec![Vec::new(); percentiles.len()];
    }
    let num_rows = values.len() / num_columns;

    let column_stats = |column: usize| -> Vec<f64> {
        let mut buffer: Vec<f64> = (0..num_rows)
            .map(|row| values[row * num_columns + column])
            .collect();
        buffer.sort_unstable_by(f64::total_cmp);
        percentiles
            .iter()
            .map(|&p| buffer[nearest_rank_index(p, num_rows)])
            .collect()
    };

    #[cfg(feature = "parallel")]
    let per_column: Vec<Vec<f64>> = (0..num_columns).into_par_iter().map(column_stats).collect();
    #[cfg(not(feature = "parallel"))]
    let per_column: Vec<Vec<f64>> = (0..num_columns).map(column_stats).collect();

    (0..percentiles.len())
        .map(|i| per_column.iter().map(|stats| stats[i]).collect())
        .collect()
}
