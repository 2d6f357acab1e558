//! Simulation results
//!
//! Contains the path ensemble produced by the path generator and the
//! reductions computed over it.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Row-major matrix of portfolio values: one row per path, one column per
/// quarter `0..=total_quarters`.
///
/// `values.len() == num_paths * num_columns` and `num_columns >= 1` always
/// hold, including for deserialized matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPathMatrix")]
pub struct PathMatrix {
    num_paths: usize,
    num_columns: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawPathMatrix {
    num_paths: usize,
    num_columns: usize,
    values: Vec<f64>,
}

impl TryFrom<RawPathMatrix> for PathMatrix {
    type Error = SimulationError;

    fn try_from(raw: RawPathMatrix) -> Result<Self, Self::Error> {
        let expected = raw.num_paths.checked_mul(raw.num_columns);
        if raw.num_columns == 0 || expected != Some(raw.values.len()) {
            return Err(SimulationError::invalid(
                "values",
                format!(
                    "expected {} x {} values, got {}",
                    raw.num_paths,
                    raw.num_columns,
                    raw.values.len()
                ),
            ));
        }
        Ok(Self {
            num_paths: raw.num_paths,
            num_columns: raw.num_columns,
            values: raw.values,
        })
    }
}

impl PathMatrix {
    /// Zero-filled matrix for `num_paths` paths over `total_quarters` quarters.
    /// Returns `None` if the matrix size overflows `usize`.
    #[must_use]
    pub fn zeros(num_paths: usize, total_quarters: usize) -> Option<Self> {
        let num_columns = total_quarters.checked_add(1)?;
        let len = num_paths.checked_mul(num_columns)?;
        Some(Self {
            num_paths,
            num_columns,
            values: vec![0.0; len],
        })
    }

    /// Build from explicit rows. Returns `None` if rows are ragged or empty.
    #[must_use]
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let num_columns = rows.first()?.len();
        if num_columns == 0 || rows.iter().any(|row| row.len() != num_columns) {
            return None;
        }
        Some(Self {
            num_paths: rows.len(),
            num_columns,
            values: rows.concat(),
        })
    }

    #[must_use]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Number of columns, i.e. `total_quarters + 1`
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    #[must_use]
    pub fn total_quarters(&self) -> usize {
        self.num_columns.saturating_sub(1)
    }

    #[must_use]
    pub fn row(&self, path: usize) -> &[f64] {
        let start = path * self.num_columns;
        &self.values[start..start + self.num_columns]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.values.chunks_exact(self.num_columns.max(1))
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, path: usize, quarter: usize) -> f64 {
        self.values[path * self.num_columns + quarter]
    }

    /// All paths' values at `quarter`
    #[must_use]
    pub fn column(&self, quarter: usize) -> Vec<f64> {
        self.rows().map(|row| row[quarter]).collect()
    }

    /// Last column of the matrix
    #[must_use]
    pub fn terminal_values(&self) -> Vec<f64> {
        self.column(self.total_quarters())
    }
}

/// Percentile time series across the ensemble, one entry per quarter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileBands {
    pub p5: Vec<f64>,
    pub p25: Vec<f64>,
    pub p50: Vec<f64>,
    pub p75: Vec<f64>,
    pub p95: Vec<f64>,
}

impl PercentileBands {
    #[must_use]
    pub fn len(&self) -> usize {
        self.p50.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.p50.is_empty()
    }

    /// `[p5, p25, p50, p75, p95]` at `quarter`
    #[must_use]
    pub fn at(&self, quarter: usize) -> [f64; 5] {
        [
            self.p5[quarter],
            self.p25[quarter],
            self.p50[quarter],
            self.p75[quarter],
            self.p95[quarter],
        ]
    }

    /// Spread between the 95th and 5th percentile at the final quarter
    #[must_use]
    pub fn terminal_spread(&self) -> f64 {
        match (self.p95.last(), self.p5.last()) {
            (Some(high), Some(low)) => high - low,
            _ => 0.0,
        }
    }
}

/// Summary probabilities, each a fraction of paths in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    /// Terminal value above the inflation-adjusted initial value
    pub outperform_inflation: f64,
    /// Value fell below half the initial value at some quarter
    pub significant_loss: f64,
    /// Value reached zero at some quarter
    pub depletion: f64,
    /// Terminal value at or above the initial value
    pub maintain_value: f64,
}

/// Peak-to-trough drawdown statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownSummary {
    /// Maximum drawdown of each path
    pub path_max_drawdowns: Vec<f64>,
    /// Largest drawdown seen on any path
    pub max_drawdown: f64,
    /// Mean of the per-path maximum drawdowns
    pub average_max_drawdown: f64,
    /// 95th percentile of the per-path maximum drawdowns
    pub p95_max_drawdown: f64,
    /// Per-quarter drawdown percentiles across paths
    pub median: Vec<f64>,
    pub p75: Vec<f64>,
    pub p95: Vec<f64>,
}

/// Distribution of terminal values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalStatistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    /// Loss at the 5th percentile as a fraction of the initial value (0 if no loss)
    pub var_95: f64,
    /// Mean loss of the worst 5% of paths as a fraction of the initial value
    pub cvar_95: f64,
    /// Compound annual growth rate of the median terminal value
    pub median_cagr: f64,
}

/// Complete output of one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Seed the ensemble was generated from
    pub seed: u64,
    /// Calendar year of quarter 1
    pub start_year: i16,
    pub total_quarters: usize,
    pub paths: PathMatrix,
    pub percentiles: PercentileBands,
    /// Initial value compounded at the inflation rate, per quarter
    pub inflation_line: Vec<f64>,
    pub terminal_values: Vec<f64>,
    pub terminal_stats: TerminalStatistics,
    pub probabilities: Probabilities,
    pub drawdown: DrawdownSummary,
}

impl SimulationResult {
    #[must_use]
    pub fn num_paths(&self) -> usize {
        self.paths.num_paths()
    }

    /// Median value at the end of each simulated year, starting with the initial value
    #[must_use]
    pub fn yearly_median(&self) -> Vec<f64> {
        self.percentiles.p50.iter().step_by(4).copied().collect()
    }
}
