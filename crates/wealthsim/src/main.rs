use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use wealthsim::{Overrides, apply_overrides, init_logging, load_parameters, render_report, write_report};
use wealthsim_core::run_simulation;

#[derive(Parser, Debug)]
#[command(name = "wealthsim")]
#[command(about = "Monte Carlo portfolio projection")]
struct Args {
    /// YAML file with the simulation parameters
    params: PathBuf,

    /// RNG seed (overrides the file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated paths (overrides the file)
    #[arg(short = 'n', long)]
    simulations: Option<usize>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include every simulated path in the report
    #[arg(long)]
    include_paths: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let mut params = load_parameters(&args.params)?;
    apply_overrides(
        &mut params,
        Overrides {
            seed: args.seed,
            simulations: args.simulations,
        },
    );

    let result = run_simulation(&params).wrap_err("simulation failed")?;
    tracing::info!(
        seed = result.seed,
        paths = result.num_paths(),
        depletion = result.probabilities.depletion,
        "simulation finished"
    );

    let json = render_report(&result, args.include_paths)?;
    write_report(&json, args.output.as_deref())?;

    Ok(())
}
