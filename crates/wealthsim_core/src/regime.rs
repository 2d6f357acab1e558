//! Regime schedule resolution
//!
//! Maps every simulated quarter to the annual return/volatility pair in
//! effect. Quarter `q >= 1` belongs to calendar year
//! `start_year + (q - 1) / 4`; quarter 0 is the starting snapshot and always
//! carries the initial regime.

use crate::config::SimulationParameters;
use crate::model::{Regime, RegimeUpdate};

/// Calendar year containing `quarter` for a simulation whose quarter 1 falls in `start_year`
#[must_use]
pub fn calendar_year(start_year: i16, quarter: usize) -> i32 {
    i32::from(start_year) + (quarter.saturating_sub(1) / 4) as i32
}

/// Per-quarter regime lookup covering quarters `0..=total_quarters`
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeSchedule {
    start_year: i16,
    quarters: Vec<Regime>,
}

impl RegimeSchedule {
    /// Resolve `updates` against `initial` over the full horizon.
    ///
    /// Updates are applied in chronological order of their transition year,
    /// whatever order they were declared in. Updates sharing a year keep
    /// declaration order, so the later one wins.
    #[must_use]
    pub fn resolve(
        initial: Regime,
        updates: &[RegimeUpdate],
        start_year: i16,
        total_quarters: usize,
    ) -> Self {
        let mut ordered = updates.to_vec();
        ordered.sort_by_key(|update| update.year);

        let mut quarters = Vec::with_capacity(total_quarters + 1);
        quarters.push(initial);

        let mut current = initial;
        let mut next = 0;
        for quarter in 1..=total_quarters {
            let year = calendar_year(start_year, quarter);
            while next < ordered.len() && i32::from(ordered[next].year) <= year {
                current = ordered[next].regime();
                next += 1;
            }
            quarters.push(current);
        }

        Self {
            start_year,
            quarters,
        }
    }

    /// Schedule with a single regime for the whole horizon
    #[must_use]
    pub fn flat(regime: Regime, total_quarters: usize) -> Self {
        Self {
            start_year: 0,
            quarters: vec![regime; total_quarters + 1],
        }
    }

    #[must_use]
    pub fn from_parameters(params: &SimulationParameters, start_year: i16) -> Self {
        Self::resolve(
            params.initial_regime(),
            &params.regime_updates(),
            start_year,
            params.total_quarters(),
        )
    }

    #[must_use]
    pub fn start_year(&self) -> i16 {
        self.start_year
    }

    #[must_use]
    pub fn total_quarters(&self) -> usize {
        self.quarters.len().saturating_sub(1)
    }

    /// Regime in effect at `quarter`, or `None` beyond the horizon
    #[must_use]
    pub fn at(&self, quarter: usize) -> Option<Regime> {
        self.quarters.get(quarter).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Regime> {
        self.quarters.iter()
    }

    /// Quarters (from 1) at which the regime differs from the previous quarter
    #[must_use]
    pub fn transitions(&self) -> Vec<(usize, Regime)> {
        self.quarters
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] != pair[1])
            .map(|(i, pair)| (i + 1, pair[1]))
            .collect()
    }
}
