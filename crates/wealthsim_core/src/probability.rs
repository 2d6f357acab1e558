//! Summary probabilities over the path ensemble

use crate::error::{Result, SimulationError};
use crate::model::{PathMatrix, Probabilities};

/// Fraction of the initial value a path must fall below to count as a significant loss
pub const SIGNIFICANT_LOSS_THRESHOLD: f64 = 0.5;

/// Compute the four summary probabilities.
///
/// `inflation_target` is the terminal value of the inflation reference line.
/// Loss and depletion are checked across every quarter of a path, not just
/// its terminal value.
pub fn compute_probabilities(
    paths: &PathMatrix,
    initial_value: f64,
    inflation_target: f64,
) -> Result<Probabilities> {
    let n = paths.num_paths();
    if n == 0 {
        return Err(SimulationError::degenerate("probabilities"));
    }

    let loss_floor = initial_value * SIGNIFICANT_LOSS_THRESHOLD;
    let mut outperform = 0usize;
    let mut significant_loss = 0usize;
    let mut depleted = 0usize;
    let mut maintained = 0usize;

    for row in paths.rows() {
        let terminal = row[row.len() - 1];
        if terminal > inflation_target {
            outperform += 1;
        }
        if terminal >= initial_value {
            maintained += 1;
        }
        if row.iter().any(|v| *v < loss_floor) {
            significant_loss += 1;
        }
        if row.iter().any(|v| *v <= 0.0) {
            depleted += 1;
        }
    }

    let ratio = |count: usize| count as f64 / n as f64;
    Ok(Probabilities {
        outperform_inflation: ratio(outperform),
        significant_loss: ratio(significant_loss),
        depletion: ratio(depleted),
        maintain_value: ratio(maintained),
    })
}
