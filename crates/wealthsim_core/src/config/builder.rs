//! Parameters Builder
//!
//! Fluent construction of `SimulationParameters`. `build()` runs the same
//! validation as the engine, so a built value is always runnable.
//!
//! # Example
//!
//! ```ignore
//! use wealthsim_core::config::ParametersBuilder;
//!
//! let params = ParametersBuilder::new()
//!     .initial_value(1_000_000.0)
//!     .regime(0.07, 0.15)
//!     .years(30)
//!     .simulations(5_000)
//!     .inflation(0.025)
//!     .update1(0.05, 0.12, 2035)
//!     .fixed_spending(10_000.0)
//!     .one_time(150_000.0, 20)
//!     .build()?;
//! ```

use super::SimulationParameters;
use crate::error::Result;
use crate::model::{RegimeUpdate, SpendingEvent};

/// Builder for `SimulationParameters`
#[derive(Debug, Clone, Default)]
pub struct ParametersBuilder {
    params: SimulationParameters,
}

impl ParametersBuilder {
    /// Start from `SimulationParameters::default()`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing parameters
    #[must_use]
    pub fn from_parameters(params: SimulationParameters) -> Self {
        Self { params }
    }

    // =========================================================================
    // Portfolio and horizon
    // =========================================================================

    #[must_use]
    pub fn initial_value(mut self, value: f64) -> Self {
        self.params.initial_value = value;
        self
    }

    /// Set the initial regime's annual return and volatility
    #[must_use]
    pub fn regime(mut self, annual_return: f64, annual_volatility: f64) -> Self {
        self.params.annual_return = annual_return;
        self.params.annual_volatility = annual_volatility;
        self
    }

    #[must_use]
    pub fn years(mut self, years: u32) -> Self {
        self.params.duration_years = years;
        self
    }

    #[must_use]
    pub fn simulations(mut self, count: usize) -> Self {
        self.params.num_simulations = count;
        self
    }

    #[must_use]
    pub fn inflation(mut self, rate: f64) -> Self {
        self.params.inflation_rate = rate;
        self
    }

    #[must_use]
    pub fn after_tax_drag(mut self, drag: f64) -> Self {
        self.params.after_tax_drag = Some(drag);
        self
    }

    #[must_use]
    pub fn start_year(mut self, year: i16) -> Self {
        self.params.start_year = Some(year);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    // =========================================================================
    // Regime transitions
    // =========================================================================

    #[must_use]
    pub fn update1(mut self, annual_return: f64, annual_volatility: f64, year: i16) -> Self {
        self.params.update1 = Some(RegimeUpdate::new(annual_return, annual_volatility, year));
        self
    }

    #[must_use]
    pub fn update2(mut self, annual_return: f64, annual_volatility: f64, year: i16) -> Self {
        self.params.update2 = Some(RegimeUpdate::new(annual_return, annual_volatility, year));
        self
    }

    // =========================================================================
    // Spending
    // =========================================================================

    /// Withdraw `amount` every quarter
    #[must_use]
    pub fn fixed_spending(mut self, amount: f64) -> Self {
        self.params.fixed_spending = Some(amount);
        self
    }

    /// Withdraw `rate` of the live value every quarter
    #[must_use]
    pub fn percentage_spending(mut self, rate: f64) -> Self {
        self.params.percentage_spending = Some(rate);
        self
    }

    /// Add `amount` to the custom withdrawal at `quarter`
    #[must_use]
    pub fn custom_spending(mut self, quarter: usize, amount: f64) -> Self {
        *self.params.custom_spending.entry(quarter).or_insert(0.0) += amount;
        self
    }

    #[must_use]
    pub fn event(mut self, event: SpendingEvent) -> Self {
        self.params.spending_events.push(event);
        self
    }

    #[must_use]
    pub fn one_time(self, amount: f64, quarter: usize) -> Self {
        self.event(SpendingEvent::OneTime { amount, quarter })
    }

    #[must_use]
    pub fn recurring(
        self,
        amount: f64,
        start_quarter: usize,
        end_quarter: usize,
        frequency: usize,
    ) -> Self {
        self.event(SpendingEvent::Recurring {
            amount,
            start_quarter,
            end_quarter,
            frequency,
        })
    }

    #[must_use]
    pub fn percentage(self, rate: f64) -> Self {
        self.event(SpendingEvent::Percentage { rate })
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Validate and return the parameters
    pub fn build(self) -> Result<SimulationParameters> {
        self.params.validate()?;
        Ok(self.params)
    }

    /// Return the parameters without validation
    #[must_use]
    pub fn build_unchecked(self) -> SimulationParameters {
        self.params
    }
}
