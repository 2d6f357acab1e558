//! Command-line front end for the projection engine
//!
//! Loads `SimulationParameters` from YAML, applies command-line overrides,
//! runs the projection and renders the result as JSON.

pub mod logging;

use std::path::Path;

use color_eyre::eyre::WrapErr;
use serde::Serialize;
use wealthsim_core::{
    DrawdownSummary, PathMatrix, PercentileBands, Probabilities, SimulationParameters,
    SimulationResult, TerminalStatistics,
};

pub use logging::init_logging;

/// Values given on the command line that replace those in the file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub simulations: Option<usize>,
}

/// Parse parameters from a YAML document
pub fn parse_parameters(yaml: &str) -> Result<SimulationParameters, serde_saphyr::Error> {
    serde_saphyr::from_str(yaml)
}

/// Read and parse a YAML parameters file
pub fn load_parameters(path: &Path) -> color_eyre::Result<SimulationParameters> {
    let yaml = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let params = parse_parameters(&yaml)
        .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        events = params.spending_events.len(),
        "parameters loaded"
    );
    Ok(params)
}

pub fn apply_overrides(params: &mut SimulationParameters, overrides: Overrides) {
    if let Some(seed) = overrides.seed {
        params.seed = Some(seed);
    }
    if let Some(count) = overrides.simulations {
        params.num_simulations = count;
    }
}

/// JSON view of a `SimulationResult`
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub seed: u64,
    pub start_year: i16,
    pub total_quarters: usize,
    pub num_paths: usize,
    pub percentiles: &'a PercentileBands,
    pub inflation_line: &'a [f64],
    pub yearly_median: Vec<f64>,
    pub terminal_stats: TerminalStatistics,
    pub probabilities: Probabilities,
    pub drawdown: &'a DrawdownSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<&'a PathMatrix>,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a SimulationResult, include_paths: bool) -> Self {
        Self {
            seed: result.seed,
            start_year: result.start_year,
            total_quarters: result.total_quarters,
            num_paths: result.num_paths(),
            percentiles: &result.percentiles,
            inflation_line: &result.inflation_line,
            yearly_median: result.yearly_median(),
            terminal_stats: result.terminal_stats,
            probabilities: result.probabilities,
            drawdown: &result.drawdown,
            paths: include_paths.then_some(&result.paths),
        }
    }
}

/// Pretty-printed JSON report
pub fn render_report(result: &SimulationResult, include_paths: bool) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report::new(result, include_paths))
}

/// Write `json` to `output`, or to stdout when no file is given
pub fn write_report(json: &str, output: Option<&Path>) -> color_eyre::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
