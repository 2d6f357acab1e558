use serde::{Deserialize, Serialize};

/// Annual return and volatility assumption in effect for a span of quarters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub annual_return: f64,
    pub annual_volatility: f64,
}

/// A regime that takes effect from the first quarter of `year` onwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeUpdate {
    pub annual_return: f64,
    pub annual_volatility: f64,
    /// Calendar year of the transition
    pub year: i16,
}

impl RegimeUpdate {
    #[must_use]
    pub fn new(annual_return: f64, annual_volatility: f64, year: i16) -> Self {
        Self {
            annual_return,
            annual_volatility,
            year,
        }
    }

    #[must_use]
    pub fn regime(&self) -> Regime {
        Regime {
            annual_return: self.annual_return,
            annual_volatility: self.annual_volatility,
        }
    }
}
