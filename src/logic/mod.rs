//! Domain logic: standings calculation and match result resolution.

mod results;
mod standings;

pub use results::{outcome_for, resolve, win_rate, MatchOutcome};
pub use standings::{points_for, sort_standings};
