//! Weight trend summary.
//!
//! Summarizes a weigh-in series for the dashboard: where it started, where it
//! is now, the extremes, and the observed rate of change per week.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::context::CalcContext;
use crate::records::{Period, WeightSample};

/// Days averaged for the smoothed "trend" weight.
pub const TREND_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTrend {
    pub samples: usize,
    pub first_weight: f64,
    pub latest_weight: f64,
    pub lowest_weight: f64,
    pub highest_weight: f64,
    /// `latest - first`; negative when weight was lost.
    pub total_change: f64,
    /// Average change per week between the first and latest sample. `None`
    /// when the samples span less than a day.
    pub weekly_change: Option<f64>,
    /// Mean of the samples taken in the last [`TREND_WINDOW_DAYS`] days
    /// before the latest sample.
    pub trend_weight: f64,
}

/// Summarize `samples`, optionally restricted to the days of `period`.
///
/// Samples need not be sorted. Returns `None` when no sample qualifies.
pub fn summarize_weights(
    samples: &[WeightSample],
    period: Option<&Period>,
    ctx: &CalcContext,
) -> Option<WeightTrend> {
    let mut selected: Vec<&WeightSample> = samples
        .iter()
        .filter(|s| s.weight.is_finite())
        .filter(|s| period.map_or(true, |p| p.contains(ctx.local_date(s.date))))
        .collect();
    selected.sort_by_key(|s| s.date);

    let first = *selected.first()?;
    let latest = *selected.last()?;

    let lowest_weight = selected.iter().map(|s| s.weight).fold(f64::INFINITY, f64::min);
    let highest_weight = selected
        .iter()
        .map(|s| s.weight)
        .fold(f64::NEG_INFINITY, f64::max);

    let total_change = latest.weight - first.weight;
    let span = latest.date - first.date;
    let weekly_change = (span >= Duration::days(1))
        .then(|| total_change / (span.num_seconds() as f64 / Duration::weeks(1).num_seconds() as f64));

    let trend_from = latest.date - Duration::days(TREND_WINDOW_DAYS);
    let recent: Vec<f64> = selected
        .iter()
        .filter(|s| s.date > trend_from)
        .map(|s| s.weight)
        .collect();
    let trend_weight = recent.iter().sum::<f64>() / recent.len() as f64;

    Some(WeightTrend {
        samples: selected.len(),
        first_weight: first.weight,
        latest_weight: latest.weight,
        lowest_weight,
        highest_weight,
        total_change,
        weekly_change,
        trend_weight,
    })
}
