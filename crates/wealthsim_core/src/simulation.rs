use std::time::Instant;

use rand::Rng;

use crate::aggregate::{Aggregation, aggregate};
use crate::config::SimulationParameters;
use crate::drawdown::analyze_drawdowns;
use crate::error::Result;
use crate::model::{DrawdownSummary, PathMatrix, Probabilities, SimulationResult};
use crate::paths::PathGenerator;
use crate::probability::compute_probabilities;
use crate::regime::RegimeSchedule;
use crate::spending::build_spending_schedule;

/// Run a full projection: validate, resolve schedules, generate the ensemble
/// and reduce it.
///
/// The result is a pure function of `params` once the seed and start year
/// are fixed; both are reported back in the result.
pub fn run_simulation(params: &SimulationParameters) -> Result<SimulationResult> {
    params.validate()?;

    let total_quarters = params.total_quarters();
    let start_year = params.resolved_start_year();
    let seed = params.seed.unwrap_or_else(|| rand::rng().random());

    let regimes = RegimeSchedule::from_parameters(params, start_year);
    let spending = build_spending_schedule(params)?;

    tracing::info!(
        num_simulations = params.num_simulations,
        total_quarters,
        start_year,
        seed,
        regime_transitions = regimes.transitions().len(),
        spending_quarters = spending.active_quarters(),
        "running portfolio projection"
    );

    let started = Instant::now();
    let generator = PathGenerator::new(
        params.initial_value,
        &regimes,
        params.drag(),
        &spending,
        seed,
    );
    let paths = generator.generate(params.num_simulations)?;
    tracing::debug!(elapsed = ?started.elapsed(), "paths generated");

    let started = Instant::now();
    let (aggregation, probabilities, drawdown) = reduce(&paths, params)?;
    tracing::debug!(elapsed = ?started.elapsed(), "ensemble reduced");

    tracing::info!(
        median_terminal = aggregation.terminal_stats.median,
        depletion = probabilities.depletion,
        max_drawdown = drawdown.max_drawdown,
        "projection complete"
    );

    Ok(SimulationResult {
        seed,
        start_year,
        total_quarters,
        paths,
        percentiles: aggregation.percentiles,
        inflation_line: aggregation.inflation_line,
        terminal_values: aggregation.terminal_values,
        terminal_stats: aggregation.terminal_stats,
        probabilities,
        drawdown,
    })
}

/// Run the three read-only reductions, concurrently when `parallel` is enabled
fn reduce(
    paths: &PathMatrix,
    params: &SimulationParameters,
) -> Result<(Aggregation, Probabilities, DrawdownSummary)> {
    let inflation_target = params.initial_value
        * (1.0 + params.inflation_rate).powf(paths.total_quarters() as f64 / 4.0);

    let run_aggregate = || {
        aggregate(
            paths,
            params.initial_value,
            params.inflation_rate,
            params.duration_years,
        )
    };
    let run_probabilities =
        || compute_probabilities(paths, params.initial_value, inflation_target);
    let run_drawdowns = || analyze_drawdowns(paths);

    #[cfg(feature = "parallel")]
    let (aggregation, (probabilities, drawdown)) = rayon::join(run_aggregate, || {
        rayon::join(run_probabilities, run_drawdowns)
    });

    #[cfg(not(feature = "parallel"))]
    let (aggregation, probabilities, drawdown) =
        (run_aggregate(), run_probabilities(), run_drawdowns());

    Ok((aggregation?, probabilities?, drawdown?))
}
