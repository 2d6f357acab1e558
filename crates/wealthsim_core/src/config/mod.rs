//! Simulation parameters
//!
//! The main configuration type is `SimulationParameters`, which contains
//! everything needed to run a projection. It deserializes from any serde
//! format with defaults for every optional field.
//!
//! # Builder DSL
//!
//! ```ignore
//! use wealthsim_core::config::ParametersBuilder;
//!
//! let params = ParametersBuilder::new()
//!     .initial_value(2_500_000.0)
//!     .regime(0.06, 0.12)
//!     .years(25)
//!     .simulations(5_000)
//!     .update1(0.045, 0.10, 2032)
//!     .recurring(40_000.0, 4, 100, 4)
//!     .seed(7)
//!     .build()?;
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::model::{Regime, RegimeUpdate, SpendingEvent};

pub mod builder;

pub use builder::ParametersBuilder;

fn default_duration_years() -> u32 {
    30
}

fn default_num_simulations() -> usize {
    1_000
}

/// Complete input for one projection run
///
/// Rates are annual decimals (`0.07` = 7%) except the spending fields, which
/// are per quarter. Quarter indices run from `0` (the starting snapshot) to
/// `duration_years * 4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Starting portfolio value
    pub initial_value: f64,

    // === Initial regime ===
    pub annual_return: f64,
    pub annual_volatility: f64,

    #[serde(default = "default_duration_years")]
    pub duration_years: u32,

    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,

    #[serde(default)]
    pub inflation_rate: f64,

    /// Annual return lost to taxes, subtracted from every regime's return
    #[serde(default)]
    pub after_tax_drag: Option<f64>,

    // === Regime transitions ===
    #[serde(default)]
    pub update1: Option<RegimeUpdate>,

    #[serde(default)]
    pub update2: Option<RegimeUpdate>,

    /// Calendar year of quarter 1. Defaults to the current year.
    #[serde(default)]
    pub start_year: Option<i16>,

    // === Spending ===
    /// Fixed amount withdrawn every quarter
    #[serde(default)]
    pub fixed_spending: Option<f64>,

    /// Fraction of the live portfolio value withdrawn every quarter
    #[serde(default)]
    pub percentage_spending: Option<f64>,

    /// Extra fixed withdrawals keyed by quarter index
    #[serde(default)]
    pub custom_spending: FxHashMap<usize, f64>,

    #[serde(default)]
    pub spending_events: Vec<SpendingEvent>,

    /// RNG seed. A random seed is drawn (and reported) when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_value: 1_000_000.0,
            annual_return: 0.07,
            annual_volatility: 0.15,
            duration_years: default_duration_years(),
            num_simulations: default_num_simulations(),
            inflation_rate: 0.03,
            after_tax_drag: None,
            update1: None,
            update2: None,
            start_year: None,
            fixed_spending: None,
            percentage_spending: None,
            custom_spending: FxHashMap::default(),
            spending_events: Vec::new(),
            seed: None,
        }
    }
}

impl SimulationParameters {
    /// Number of simulated quarters (excluding the quarter-0 snapshot)
    #[must_use]
    pub fn total_quarters(&self) -> usize {
        self.duration_years as usize * 4
    }

    #[must_use]
    pub fn initial_regime(&self) -> Regime {
        Regime {
            annual_return: self.annual_return,
            annual_volatility: self.annual_volatility,
        }
    }

    /// Declared regime transitions, in declaration order
    #[must_use]
    pub fn regime_updates(&self) -> Vec<RegimeUpdate> {
        self.update1.iter().chain(self.update2.iter()).copied().collect()
    }

    #[must_use]
    pub fn drag(&self) -> f64 {
        self.after_tax_drag.unwrap_or(0.0)
    }

    /// Start year, falling back to the current civil year
    #[must_use]
    pub fn resolved_start_year(&self) -> i16 {
        self.start_year
            .unwrap_or_else(|| jiff::Zoned::now().date().year())
    }

    /// Check every parameter, spending events included, before any
    /// simulation work begins.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return Err(SimulationError::invalid(
                "initial_value",
                format!("must be a positive finite number, got {}", self.initial_value),
            ));
        }
        if self.duration_years == 0 {
            return Err(SimulationError::invalid(
                "duration_years",
                "must be a positive integer",
            ));
        }
        if self.num_simulations == 0 {
            return Err(SimulationError::invalid(
                "num_simulations",
                "must be a positive integer",
            ));
        }
        let total_quarters = self.total_quarters();
        if self.num_simulations.checked_mul(total_quarters + 1).is_none() {
            return Err(SimulationError::invalid(
                "num_simulations",
                format!(
                    "{} paths over {total_quarters} quarters exceed the addressable ensemble size",
                    self.num_simulations
                ),
            ));
        }

        let drag = self.drag();
        if !drag.is_finite() || drag < 0.0 {
            return Err(SimulationError::invalid(
                "after_tax_drag",
                format!("must be a non-negative finite number, got {drag}"),
            ));
        }

        validate_regime("", self.initial_regime(), drag)?;
        if let Some(update) = &self.update1 {
            validate_regime("update1.", update.regime(), drag)?;
        }
        if let Some(update) = &self.update2 {
            validate_regime("update2.", update.regime(), drag)?;
        }
        if let (Some(first), Some(second)) = (&self.update1, &self.update2)
            && second.year < first.year
        {
            return Err(SimulationError::AmbiguousRegimeOrdering {
                first_year: first.year,
                second_year: second.year,
            });
        }

        if !self.inflation_rate.is_finite() || self.inflation_rate <= -1.0 {
            return Err(SimulationError::invalid(
                "inflation_rate",
                format!("must be finite and greater than -1, got {}", self.inflation_rate),
            ));
        }

        if let Some(amount) = self.fixed_spending {
            validate_amount("fixed_spending", amount)?;
        }
        if let Some(rate) = self.percentage_spending {
            validate_rate("percentage_spending", rate)?;
        }

        for (&quarter, &amount) in &self.custom_spending {
            let field = format!("custom_spending[{quarter}]");
            if quarter > total_quarters {
                return Err(SimulationError::invalid(
                    field,
                    format!("quarter must be within [0, {total_quarters}]"),
                ));
            }
            validate_amount(&field, amount)?;
        }

        for (index, event) in self.spending_events.iter().enumerate() {
            event.validate(index, total_quarters)?;
        }

        Ok(())
    }
}

fn validate_regime(prefix: &str, regime: Regime, drag: f64) -> Result<()> {
    if !regime.annual_volatility.is_finite() || regime.annual_volatility < 0.0 {
        return Err(SimulationError::invalid(
            format!("{prefix}annual_volatility"),
            format!(
                "must be a non-negative finite number, got {}",
                regime.annual_volatility
            ),
        ));
    }
    if !regime.annual_return.is_finite() || regime.annual_return - drag <= -1.0 {
        return Err(SimulationError::invalid(
            format!("{prefix}annual_return"),
            format!(
                "return net of drag must be finite and greater than -1, got {}",
                regime.annual_return - drag
            ),
        ));
    }
    Ok(())
}

pub(crate) fn validate_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SimulationError::invalid(
            field,
            format!("must be a non-negative finite amount, got {amount}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_rate(field: &str, rate: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(SimulationError::invalid(
            field,
            format!("must be within [0, 1], got {rate}"),
        ));
    }
    Ok(())
}
