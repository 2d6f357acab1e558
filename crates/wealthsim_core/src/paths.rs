//! Monte Carlo path generation
//!
//! Each path compounds quarter by quarter with a log-normal growth factor
//!
//! ```text
//! G = exp(ln(1 + r - drag) / 4 - σq² / 2 + σq · Z),   σq = σ / 2,   Z ~ N(0, 1)
//! ```
//!
//! so the expected quarterly growth is the geometric quarter of the annual
//! net return and a path can never go negative. After growth the quarter's
//! fixed withdrawal and `rate × pre-withdrawal value` are subtracted and the
//! result is floored at zero. A depleted path stays at zero.
//!
//! Every path owns its own RNG, seeded from the run seed and the path index,
//! so the ensemble is bit-identical however the rows are split across threads.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, StandardNormal};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, SimulationError};
use crate::model::{PathMatrix, Regime, ResolvedSpendingSchedule};
use crate::regime::RegimeSchedule;

/// Quarterly log-drift and log-volatility derived from an annual regime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterStep {
    pub drift: f64,
    pub sigma: f64,
}

impl QuarterStep {
    #[must_use]
    pub fn from_regime(regime: Regime, drag: f64) -> Self {
        let sigma = regime.annual_volatility / 2.0;
        let drift = (1.0 + regime.annual_return - drag).ln() / 4.0 - 0.5 * sigma * sigma;
        Self { drift, sigma }
    }

    /// Growth factor for a standard normal draw `z`
    #[inline]
    #[must_use]
    pub fn growth(&self, z: f64) -> f64 {
        (self.drift + self.sigma * z).exp()
    }
}

/// SplitMix64 finalizer, used to decorrelate per-path seeds
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Deterministic RNG for path `index` of a run seeded with `seed`
#[must_use]
pub fn path_rng(seed: u64, index: usize) -> SmallRng {
    SmallRng::seed_from_u64(splitmix64(seed ^ splitmix64(index as u64)))
}

/// Precomputed inputs shared by every path of one run
#[derive(Debug, Clone)]
pub struct PathGenerator {
    initial_value: f64,
    /// Indexed by quarter `0..=Q`; entry 0 is unused
    steps: Vec<QuarterStep>,
    /// Indexed by quarter `0..=Q`; entry 0 is unused
    withdrawals: Vec<f64>,
    percentage_rate: f64,
    seed: u64,
}

impl PathGenerator {
    #[must_use]
    pub fn new(
        initial_value: f64,
        regimes: &RegimeSchedule,
        drag: f64,
        spending: &ResolvedSpendingSchedule,
        seed: u64,
    ) -> Self {
        let total_quarters = regimes.total_quarters();
        Self {
            initial_value,
            steps: regimes
                .iter()
                .map(|regime| QuarterStep::from_regime(*regime, drag))
                .collect(),
            withdrawals: spending.dense(total_quarters),
            percentage_rate: spending.effective_rate(),
            seed,
        }
    }

    #[must_use]
    pub fn total_quarters(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Generate `num_paths` independent paths.
    ///
    /// Fails if the ensemble does not fit in memory addressable by `usize`.
    pub fn generate(&self, num_paths: usize) -> Result<PathMatrix> {
        let mut matrix = PathMatrix::zeros(num_paths, self.total_quarters()).ok_or_else(|| {
            SimulationError::invalid(
                "num_simulations",
                format!("{num_paths} paths over {} quarters overflow", self.total_quarters()),
            )
        })?;
        let num_columns = matrix.num_columns();

        #[cfg(feature = "parallel")]
        matrix
            .values_mut()
            .par_chunks_mut(num_columns)
            .enumerate()
            .for_each(|(index, row)| self.fill_path(index, row));

        #[cfg(not(feature = "parallel"))]
        matrix
            .values_mut()
            .chunks_mut(num_columns)
            .enumerate()
            .for_each(|(index, row)| self.fill_path(index, row));

        Ok(matrix)
    }

    /// Simulate path `index` into `row` (length `Q + 1`)
    pub fn fill_path(&self, index: usize, row: &mut [f64]) {
        let mut rng = path_rng(self.seed, index);
        let mut value = self.initial_value;
        row[0] = value;

        for quarter in 1..row.len() {
            if value <= 0.0 {
                row[quarter..].fill(0.0);
                return;
            }

            let z: f64 = StandardNormal.sample(&mut rng);
            let grown = value * self.steps[quarter].growth(z);
            let withdrawal = self.withdrawals[quarter] + self.percentage_rate * grown;
            value = (grown - withdrawal).max(0.0);
            row[quarter] = value;
        }
    }
}

/// Convenience wrapper: build a generator and produce the ensemble
pub fn generate_paths(
    initial_value: f64,
    regimes: &RegimeSchedule,
    drag: f64,
    spending: &ResolvedSpendingSchedule,
    num_paths: usize,
    seed: u64,
) -> Result<PathMatrix> {
    PathGenerator::new(initial_value, regimes, drag, spending, seed).generate(num_paths)
}
