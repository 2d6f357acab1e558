//! Monte Carlo portfolio-projection engine
//!
//! This crate simulates stochastic quarterly return paths for a portfolio and
//! reduces the ensemble into the figures an advisor dashboard displays:
//! - Piecewise return/volatility regimes switching at calendar years
//! - One-time, recurring and percentage-of-value spending
//! - Log-normal quarterly compounding floored at zero
//! - Percentile bands (5/25/50/75/95) and an inflation reference line
//! - Probabilities of beating inflation, large losses, depletion, holding value
//! - Per-path drawdowns with percentile bands and summary statistics
//!
//! # Example
//!
//! ```ignore
//! use wealthsim_core::{ParametersBuilder, run_simulation};
//!
//! let params = ParametersBuilder::new()
//!     .initial_value(1_000_000.0)
//!     .regime(0.07, 0.15)
//!     .years(30)
//!     .simulations(5_000)
//!     .recurring(50_000.0, 4, 120, 4)
//!     .seed(42)
//!     .build()?;
//!
//! let result = run_simulation(&params)?;
//! println!("depletion risk: {:.1}%", result.probabilities.depletion * 100.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod drawdown;
pub mod error;
pub mod paths;
pub mod percentile;
pub mod probability;
pub mod regime;
pub mod simulation;
pub mod spending;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ParametersBuilder, SimulationParameters};
pub use error::{Result, SimulationError};
pub use model::{
    DrawdownSummary, PathMatrix, PercentileBands, Probabilities, ResolvedSpendingSchedule,
    SimulationResult, SpendingEvent, TerminalStatistics,
};
pub use simulation::run_simulation;
pub use spending::resolve_spending_schedule;
