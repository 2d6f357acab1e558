//! Ensemble aggregation: percentile bands, inflation reference line and
//! terminal-value statistics.

use crate::error::{Result, SimulationError};
use crate::model::{PathMatrix, PercentileBands, TerminalStatistics};
use crate::percentile::{BAND_PERCENTILES, column_percentiles, percentile_sorted};

/// Output of the aggregation stage
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub percentiles: PercentileBands,
    pub inflation_line: Vec<f64>,
    pub terminal_values: Vec<f64>,
    pub terminal_stats: TerminalStatistics,
}

/// p5/p25/p50/p75/p95 across paths at every quarter
pub fn percentile_bands(paths: &PathMatrix) -> Result<PercentileBands> {
    if paths.num_paths() == 0 {
        return Err(SimulationError::degenerate("percentile bands"));
    }

    let mut series =
        column_percentiles(paths.values(), paths.num_columns(), &BAND_PERCENTILES).into_iter();
    let mut next = || series.next().unwrap_or_default();

    Ok(PercentileBands {
        p5: next(),
        p25: next(),
        p50: next(),
        p75: next(),
        p95: next(),
    })
}

/// `initial_value × (1 + inflation_rate)^(q / 4)` for `q` in `0..=total_quarters`
#[must_use]
pub fn inflation_line(initial_value: f64, inflation_rate: f64, total_quarters: usize) -> Vec<f64> {
    (0..=total_quarters)
        .map(|quarter| initial_value * (1.0 + inflation_rate).powf(quarter as f64 / 4.0))
        .collect()
}

/// Distribution statistics of the terminal values.
///
/// `years` is the simulated horizon used to annualise the median growth.
pub fn terminal_statistics(
    terminal_values: &[f64],
    initial_value: f64,
    years: u32,
) -> Result<TerminalStatistics> {
    if terminal_values.is_empty() {
        return Err(SimulationError::degenerate("terminal statistics"));
    }

    let mut sorted = terminal_values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let n = sorted.len() as f64;

    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let median = percentile_sorted(&sorted, 50.0).unwrap_or(0.0);
    let p5 = percentile_sorted(&sorted, 5.0).unwrap_or(0.0);

    let loss_fraction = |value: f64| ((initial_value - value) / initial_value).max(0.0);

    let tail: Vec<f64> = sorted.iter().copied().take_while(|v| *v <= p5).collect();
    let tail_mean = tail.iter().sum::<f64>() / tail.len() as f64;

    let median_cagr = if median <= 0.0 {
        -1.0
    } else if years == 0 {
        0.0
    } else {
        (median / initial_value).powf(1.0 / f64::from(years)) - 1.0
    };

    Ok(TerminalStatistics {
        mean,
        median,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        std_dev: variance.sqrt(),
        var_95: loss_fraction(p5),
        cvar_95: loss_fraction(tail_mean),
        median_cagr,
    })
}

/// Run the full aggregation stage over a completed ensemble
pub fn aggregate(
    paths: &PathMatrix,
    initial_value: f64,
    inflation_rate: f64,
    years: u32,
) -> Result<Aggregation> {
    let percentiles = percentile_bands(paths)?;
    let terminal_values = paths.terminal_values();
    let terminal_stats = terminal_statistics(&terminal_values, initial_value, years)?;

    Ok(Aggregation {
        percentiles,
        inflation_line: inflation_line(initial_value, inflation_rate, paths.total_quarters()),
        terminal_values,
        terminal_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder(n: usize) -> PathMatrix {
        // Path i grows linearly to i+1 over two quarters
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| vec![1.0, 1.0 + i as f64 / 2.0, 1.0 + i as f64])
            .collect();
        PathMatrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_bands_use_nearest_rank() {
        let bands = percentile_bands(&ladder(20)).unwrap();

        assert_eq!(bands.len(), 3);
        assert_eq!(bands.at(0), [1.0; 5]);
        // Terminal values 1..=20: ranks 1, 5, 10, 15, 19
        assert_eq!(bands.at(2), [1.0, 5.0, 10.0, 15.0, 19.0]);
        assert_eq!(bands.terminal_spread(), 18.0);
    }

    #[test]
    fn test_bands_reject_empty_ensemble() {
        let err = percentile_bands(&PathMatrix::zeros(0, 4).unwrap()).unwrap_err();
        assert!(matches!(err, SimulationError::NumericDegeneracy { .. }));
    }

    #[test]
    fn test_inflation_line() {
        let line = inflation_line(100.0, 0.05, 8);
        assert_eq!(line.len(), 9);
        assert_eq!(line[0], 100.0);
        assert!((line[4] - 105.0).abs() < 1e-9);
        assert!((line[8] - 110.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_inflation_line_is_flat() {
        assert!(inflation_line(50.0, 0.0, 12).iter().all(|v| *v == 50.0));
    }

    #[test]
    fn test_terminal_statistics() {
        let terminal: Vec<f64> = (1..=20).map(|v| v as f64 * 10.0).collect();
        let stats = terminal_statistics(&terminal, 100.0, 1).unwrap();

        assert!((stats.mean - 105.0).abs() < 1e-9);
        assert_eq!(stats.median, 100.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 200.0);
        // p5 of 20 values is the 1st value
        assert!((stats.var_95 - 0.9).abs() < 1e-12);
        assert!((stats.cvar_95 - 0.9).abs() < 1e-12);
        assert!(stats.median_cagr.abs() < 1e-12);
        assert!(stats.std_dev > 0.0);
    }

    #[test]
    fn test_terminal_statistics_gain_has_no_var() {
        let stats = terminal_statistics(&[150.0, 200.0], 100.0, 2).unwrap();
        assert_eq!(stats.var_95, 0.0);
        assert_eq!(stats.cvar_95, 0.0);
        assert!((stats.median_cagr - (1.5f64.sqrt() - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_statistics_depleted_median() {
        let stats = terminal_statistics(&[0.0, 0.0, 10.0], 100.0, 5).unwrap();
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.median_cagr, -1.0);
        assert_eq!(stats.var_95, 1.0);
    }

    #[test]
    fn test_aggregate_collects_terminal_column() {
        let aggregation = aggregate(&ladder(4), 1.0, 0.0, 1).unwrap();
        assert_eq!(aggregation.terminal_values, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(aggregation.inflation_line, vec![1.0, 1.0, 1.0]);
    }
}
