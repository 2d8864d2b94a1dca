//! Fasting streak and summary statistics.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::context::CalcContext;
use crate::records::FastingInterval;

/// Maximum number of days examined when counting the current streak.
pub const STREAK_LOOKBACK_DAYS: u32 = 365;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Summary of a fasting log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FastingSummary {
    /// Consecutive days, ending today, with a fast starting or ending on them.
    pub current_streak: u32,
    /// Longest completed fast, in hours.
    pub longest_fast_hours: f64,
    /// Mean length of completed fasts, in hours.
    pub average_fast_hours: f64,
    pub completed_fasts: u64,
    /// Elapsed hours of the running fast, if one is open.
    pub in_progress_hours: Option<f64>,
}

/// Summarize `intervals` at `ctx.now`. Input order does not matter.
pub fn summarize_fasting(intervals: &[FastingInterval], ctx: &CalcContext) -> FastingSummary {
    let mut longest_ms: i64 = 0;
    let mut total_ms: i64 = 0;
    let mut completed: u64 = 0;

    for duration in intervals.iter().filter_map(FastingInterval::duration) {
        let ms = duration.num_milliseconds();
        longest_ms = longest_ms.max(ms);
        total_ms += ms;
        completed += 1;
    }

    let average_fast_hours = if completed > 0 {
        total_ms as f64 / MILLIS_PER_HOUR / completed as f64
    } else {
        0.0
    };

    let in_progress_hours = intervals
        .iter()
        .filter(|i| i.is_open())
        .max_by_key(|i| i.start)
        .map(|i| i.elapsed(ctx.now).num_milliseconds() as f64 / MILLIS_PER_HOUR);

    FastingSummary {
        current_streak: current_streak(intervals, ctx),
        longest_fast_hours: longest_ms as f64 / MILLIS_PER_HOUR,
        average_fast_hours,
        completed_fasts: completed,
        in_progress_hours,
    }
}

/// Count consecutive local calendar days, walking back from today, on which
/// some fast started or ended. Stops at the first day without one and never
/// looks back more than [`STREAK_LOOKBACK_DAYS`].
pub fn current_streak(intervals: &[FastingInterval], ctx: &CalcContext) -> u32 {
    let active_days: HashSet<NaiveDate> = intervals
        .iter()
        .flat_map(|i| {
            let start = Some(ctx.local_date(i.start));
            let end = i.end.map(|e| ctx.local_date(e));
            start.into_iter().chain(end)
        })
        .collect();

    let today = ctx.today();
    let mut streak = 0;
    while streak < STREAK_LOOKBACK_DAYS {
        let day = today - Duration::days(i64::from(streak));
        if !active_days.contains(&day) {
            break;
        }
        streak += 1;
    }
    streak
}
