mod regime;
mod results;
mod spending;

pub use regime::{Regime, RegimeUpdate};
pub use results::{
    DrawdownSummary, PathMatrix, PercentileBands, Probabilities, SimulationResult,
    TerminalStatistics,
};
pub use spending::{ResolvedSpendingSchedule, SpendingEvent};
