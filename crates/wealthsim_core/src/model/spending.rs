//! Spending events and their resolved per-quarter form

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::{validate_amount, validate_rate};
use crate::error::{Result, SimulationError};

/// A discretionary withdrawal from the portfolio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpendingEvent {
    /// Single withdrawal at `quarter`
    OneTime { amount: f64, quarter: usize },
    /// Withdrawal at every `frequency`-th quarter from `start_quarter` through `end_quarter`
    Recurring {
        amount: f64,
        start_quarter: usize,
        end_quarter: usize,
        frequency: usize,
    },
    /// Fraction of the live (pre-withdrawal) value, taken every quarter
    Percentage { rate: f64 },
}

impl SpendingEvent {
    /// Validate this event as element `index` of a list covering `total_quarters`
    pub fn validate(&self, index: usize, total_quarters: usize) -> Result<()> {
        let field = |name: &str| format!("spending_events[{index}].{name}");
        let check_quarter = |name: &str, quarter: usize| {
            if quarter > total_quarters {
                Err(SimulationError::invalid(
                    field(name),
                    format!("quarter {quarter} is outside [0, {total_quarters}]"),
                ))
            } else {
                Ok(())
            }
        };

        match *self {
            SpendingEvent::OneTime { amount, quarter } => {
                validate_amount(&field("amount"), amount)?;
                check_quarter("quarter", quarter)
            }
            SpendingEvent::Recurring {
                amount,
                start_quarter,
                end_quarter,
                frequency,
            } => {
                validate_amount(&field("amount"), amount)?;
                check_quarter("start_quarter", start_quarter)?;
                check_quarter("end_quarter", end_quarter)?;
                if start_quarter > end_quarter {
                    return Err(SimulationError::invalid(
                        field("end_quarter"),
                        format!("must not precede start_quarter {start_quarter}"),
                    ));
                }
                if frequency == 0 {
                    return Err(SimulationError::invalid(
                        field("frequency"),
                        "must be at least 1",
                    ));
                }
                Ok(())
            }
            SpendingEvent::Percentage { rate } => validate_rate(&field("rate"), rate),
        }
    }
}

/// Spending resolved into fixed per-quarter amounts plus a live-value rate.
///
/// The percentage rate is kept apart from the fixed map because it depends on
/// each path's value at the time of withdrawal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpendingSchedule {
    /// Quarter index -> fixed withdrawal amount
    pub fixed: FxHashMap<usize, f64>,
    /// Summed quarterly percentage rate
    pub percentage_rate: f64,
}

impl ResolvedSpendingSchedule {
    /// Add `amount` to whatever is already scheduled at `quarter`
    pub fn add_fixed(&mut self, quarter: usize, amount: f64) {
        *self.fixed.entry(quarter).or_insert(0.0) += amount;
    }

    pub fn add_rate(&mut self, rate: f64) {
        self.percentage_rate += rate;
    }

    /// Fold another schedule into this one, summing overlaps
    pub fn merge(&mut self, other: &ResolvedSpendingSchedule) {
        for (&quarter, &amount) in &other.fixed {
            self.add_fixed(quarter, amount);
        }
        self.add_rate(other.percentage_rate);
    }

    #[must_use]
    pub fn fixed_at(&self, quarter: usize) -> f64 {
        self.fixed.get(&quarter).copied().unwrap_or(0.0)
    }

    /// Rate actually applied to a path; summed rates above 100% withdraw everything
    #[must_use]
    pub fn effective_rate(&self) -> f64 {
        self.percentage_rate.clamp(0.0, 1.0)
    }

    /// Number of quarters with a non-zero fixed withdrawal
    #[must_use]
    pub fn active_quarters(&self) -> usize {
        self.fixed.values().filter(|amount| **amount != 0.0).count()
    }

    /// Dense withdrawal vector indexed by quarter `0..=total_quarters`.
    /// Entries beyond the horizon are dropped.
    #[must_use]
    pub fn dense(&self, total_quarters: usize) -> Vec<f64> {
        let mut withdrawals = vec![0.0; total_quarters + 1];
        for (&quarter, &amount) in &self.fixed {
            if let Some(slot) = withdrawals.get_mut(quarter) {
                *slot += amount;
            }
        }
        withdrawals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_fixed_sums_same_quarter() {
        let mut schedule = ResolvedSpendingSchedule::default();
        schedule.add_fixed(3, 100.0);
        schedule.add_fixed(3, 50.0);
        assert_eq!(schedule.fixed_at(3), 150.0);
        assert_eq!(schedule.fixed_at(4), 0.0);
    }

    #[test]
    fn test_merge_sums_overlaps() {
        let mut schedule = ResolvedSpendingSchedule::default();
        schedule.add_fixed(2, 100.0);
        schedule.add_rate(0.01);

        let mut other = ResolvedSpendingSchedule::default();
        other.add_fixed(2, 25.0);
        other.add_fixed(5, 40.0);
        other.add_rate(0.02);

        schedule.merge(&other);

        assert_eq!(schedule.fixed_at(2), 125.0);
        assert_eq!(schedule.fixed_at(5), 40.0);
        assert_eq!(schedule.active_quarters(), 2);
        assert!((schedule.percentage_rate - 0.03).abs() < 1e-15);
        // The merged-in schedule is left untouched
        assert_eq!(other.fixed_at(2), 25.0);
    }

    #[test]
    fn test_effective_rate_is_capped() {
        let schedule = ResolvedSpendingSchedule {
            fixed: FxHashMap::default(),
            percentage_rate: 1.4,
        };
        assert_eq!(schedule.effective_rate(), 1.0);
    }

    #[test]
    fn test_dense_drops_out_of_range_quarters() {
        let mut schedule = ResolvedSpendingSchedule::default();
        schedule.add_fixed(2, 10.0);
        schedule.add_fixed(99, 10.0);
        let dense = schedule.dense(4);
        assert_eq!(dense, vec![0.0, 0.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_recurring_validation_names_field() {
        let event = SpendingEvent::Recurring {
            amount: 10.0,
            start_quarter: 4,
            end_quarter: 8,
            frequency: 0,
        };
        let err = event.validate(2, 40).unwrap_err();
        assert_eq!(err.field(), Some("spending_events[2].frequency"));
    }

    #[test]
    fn test_one_time_quarter_out_of_range() {
        let event = SpendingEvent::OneTime {
            amount: 10.0,
            quarter: 41,
        };
        let err = event.validate(0, 40).unwrap_err();
        assert_eq!(err.field(), Some("spending_events[0].quarter"));
    }

    #[test]
    fn test_percentage_rate_bounds() {
        assert!(SpendingEvent::Percentage { rate: 1.0 }.validate(0, 4).is_ok());
        assert!(SpendingEvent::Percentage { rate: -0.1 }.validate(0, 4).is_err());
        assert!(SpendingEvent::Percentage { rate: 1.1 }.validate(0, 4).is_err());
    }
}
