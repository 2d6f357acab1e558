//! Peak-to-trough drawdown analysis

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, SimulationError};
use crate::model::{DrawdownSummary, PathMatrix};
use crate::percentile::{DRAWDOWN_PERCENTILES, column_percentiles, percentile};

/// Write the drawdown series of `path` into `out`.
///
/// `out[t] = (peak[t] - path[t]) / peak[t]` with `peak[t]` the running
/// maximum. A non-positive peak yields a drawdown of 0. Returns the maximum
/// drawdown of the path.
fn fill_drawdowns(path: &[f64], out: &mut [f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;
    for (value, slot) in path.iter().zip(out.iter_mut()) {
        peak = peak.max(*value);
        let drawdown = if peak > 0.0 {
            ((peak - value) / peak).clamp(0.0, 1.0)
        } else {
            0.0
        };
        *slot = drawdown;
        max_drawdown = max_drawdown.max(drawdown);
    }
    max_drawdown
}

/// Drawdown series of a single path
#[must_use]
pub fn drawdown_series(path: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; path.len()];
    fill_drawdowns(path, &mut out);
    out
}

/// Maximum drawdown of a single path
#[must_use]
pub fn max_drawdown(path: &[f64]) -> f64 {
    let mut out = vec![0.0; path.len()];
    fill_drawdowns(path, &mut out)
}

/// Drawdown bands and summary statistics over the ensemble
pub fn analyze_drawdowns(paths: &PathMatrix) -> Result<DrawdownSummary> {
    let n = paths.num_paths();
    if n == 0 {
        return Err(SimulationError::degenerate("drawdown analysis"));
    }

    let num_columns = paths.num_columns();
    let mut drawdowns = vec![0.0; paths.values().len()];

    #[cfg(feature = "parallel")]
    let path_max_drawdowns: Vec<f64> = paths
        .values()
        .par_chunks(num_columns)
        .zip(drawdowns.par_chunks_mut(num_columns))
        .map(|(path, out)| fill_drawdowns(path, out))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let path_max_drawdowns: Vec<f64> = paths
        .values()
        .chunks(num_columns)
        .zip(drawdowns.chunks_mut(num_columns))
        .map(|(path, out)| fill_drawdowns(path, out))
        .collect();

    let mut series =
        column_percentiles(&drawdowns, num_columns, &DRAWDOWN_PERCENTILES).into_iter();
    let median = series.next().unwrap_or_default();
    let p75 = series.next().unwrap_or_default();
    let p95 = series.next().unwrap_or_default();

    let mut sorted_max = path_max_drawdowns.clone();
    let p95_max_drawdown = percentile(&mut sorted_max, 95.0).unwrap_or(0.0);
    let max_drawdown = sorted_max.last().copied().unwrap_or(0.0);
    let average_max_drawdown = path_max_drawdowns.iter().sum::<f64>() / n as f64;

    Ok(DrawdownSummary {
        path_max_drawdowns,
        max_drawdown,
        average_max_drawdown,
        p95_max_drawdown,
        median,
        p75,
        p95,
    })
}
