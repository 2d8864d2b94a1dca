//! Log records consumed by the calculators.
//!
//! Records arrive already normalised (see [`crate::boundary`]); nothing here
//! parses loosely typed input.

mod interval;
mod period;
mod weight;

pub use interval::FastingInterval;
pub use period::{active_period, GoalProgress, Period, PeriodKind};
pub use weight::{sort_by_date, WeightSample};
