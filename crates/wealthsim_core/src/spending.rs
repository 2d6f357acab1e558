//! Spending schedule resolution
//!
//! Converts heterogeneous spending inputs into a `ResolvedSpendingSchedule`.
//! Amounts landing on the same quarter are summed, never overwritten, so the
//! result does not depend on input order.

use crate::config::SimulationParameters;
use crate::error::Result;
use crate::model::{ResolvedSpendingSchedule, SpendingEvent};

/// Resolve `events` over a horizon of `total_quarters` quarters.
///
/// Every event is validated before anything is resolved; the first invalid
/// event is reported with its index.
pub fn resolve_spending_schedule(
    events: &[SpendingEvent],
    total_quarters: usize,
) -> Result<ResolvedSpendingSchedule> {
    for (index, event) in events.iter().enumerate() {
        event.validate(index, total_quarters)?;
    }

    let mut schedule = ResolvedSpendingSchedule::default();
    for event in events {
        match *event {
            SpendingEvent::OneTime { amount, quarter } => schedule.add_fixed(quarter, amount),
            SpendingEvent::Recurring {
                amount,
                start_quarter,
                end_quarter,
                frequency,
            } => {
                for quarter in (start_quarter..=end_quarter).step_by(frequency) {
                    schedule.add_fixed(quarter, amount);
                }
            }
            SpendingEvent::Percentage { rate } => schedule.add_rate(rate),
        }
    }

    Ok(schedule)
}

/// Schedule holding the custom per-quarter map and the flat amount and rate
fn flat_spending_schedule(params: &SimulationParameters) -> ResolvedSpendingSchedule {
    let mut schedule = ResolvedSpendingSchedule::default();
    for (&quarter, &amount) in &params.custom_spending {
        schedule.add_fixed(quarter, amount);
    }
    if let Some(amount) = params.fixed_spending
        && amount > 0.0
    {
        for quarter in 1..=params.total_quarters() {
            schedule.add_fixed(quarter, amount);
        }
    }
    if let Some(rate) = params.percentage_spending {
        schedule.add_rate(rate);
    }
    schedule
}

/// Merge every spending input of `params` into one schedule.
///
/// Combines the flat quarterly amount (quarters `1..=Q`), the custom
/// per-quarter map, the flat percentage rate and the spending events.
/// Parameters are assumed to have been validated already.
pub fn build_spending_schedule(params: &SimulationParameters) -> Result<ResolvedSpendingSchedule> {
    let total_quarters = params.total_quarters();
    let mut schedule = resolve_spending_schedule(&params.spending_events, total_quarters)?;
    schedule.merge(&flat_spending_schedule(params));

    let at_start = schedule.fixed_at(0);
    if at_start > 0.0 {
        tracing::warn!(
            amount = at_start,
            "spending scheduled at quarter 0 is ignored; quarter 0 is the starting value"
        );
    }
    if schedule.percentage_rate > 1.0 {
        tracing::warn!(
            rate = schedule.percentage_rate,
            "summed percentage spending exceeds 100%; paths deplete in their first quarter"
        );
    }

    Ok(schedule)
}
