//! Weight projection estimator.
//!
//! Estimates when a target weight will be reached with a two-phase linear
//! model. This is an approximation, not a guarantee:
//!
//! - the first 80% of the weight to lose goes at the requested weekly rate;
//! - the remainder (the last 20%) goes at a fixed taper of 1 unit per week,
//!   in whatever unit the weights are expressed in;
//! - one extra week is added to the rounded-up total;
//! - the estimate never exceeds 104 weeks.
//!
//! The constants are kept exactly as the product has always computed them.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Share of the total that is lost at the requested rate.
pub const NORMAL_PHASE_SHARE: f64 = 0.8;
/// Loss per week during the taper phase.
pub const TAPER_RATE_PER_WEEK: f64 = 1.0;
/// Weeks added to every estimate.
pub const BUFFER_WEEKS: u32 = 1;
/// Upper bound on any estimate (two years).
pub const MAX_WEEKS: u32 = 104;

/// Result of a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub start_date: NaiveDate,
    pub completion_date: NaiveDate,
    pub weeks_needed: u32,
    /// Unrounded weeks spent in the normal-rate phase.
    pub normal_phase_weeks: f64,
    /// Unrounded weeks spent in the taper phase.
    pub taper_phase_weeks: f64,
    /// True when the estimate hit [`MAX_WEEKS`].
    pub capped: bool,
}

/// Estimate the completion date for losing from `start_weight` to
/// `target_weight` at `weekly_rate` per week, starting on `start_date`.
///
/// Returns `None` when there is nothing to lose (`start_weight <=
/// target_weight`), when `weekly_rate <= 0`, or when any input is not finite.
pub fn estimate_completion(
    start_weight: f64,
    target_weight: f64,
    weekly_rate: f64,
    start_date: NaiveDate,
) -> Option<Projection> {
    if !(start_weight.is_finite() && target_weight.is_finite() && weekly_rate.is_finite()) {
        return None;
    }
    if start_weight <= target_weight || weekly_rate <= 0.0 {
        return None;
    }

    let total = start_weight - target_weight;
    let normal_amount = total * NORMAL_PHASE_SHARE;
    // Taper is the remainder so both phases sum back to `total`. Computing it
    // as `total * 0.2` adds float noise that can push `ceil` up a whole week.
    let taper_amount = total - normal_amount;

    let normal_phase_weeks = normal_amount / weekly_rate;
    let taper_phase_weeks = taper_amount / TAPER_RATE_PER_WEEK;

    let raw = (normal_phase_weeks + taper_phase_weeks).ceil() + f64::from(BUFFER_WEEKS);
    let capped = raw >= f64::from(MAX_WEEKS);
    let weeks_needed = if capped { MAX_WEEKS } else { raw as u32 };

    let completion_date =
        start_date.checked_add_signed(Duration::weeks(i64::from(weeks_needed)))?;

    tracing::debug!(
        total,
        weekly_rate,
        weeks_needed,
        capped,
        "projected completion"
    );

    Some(Projection {
        start_date,
        completion_date,
        weeks_needed,
        normal_phase_weeks,
        taper_phase_weeks,
        capped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_projection() {
        let start = date(2026, 1, 5);
        let projection = estimate_completion(180.0, 160.0, 1.5, start).unwrap();

        assert_eq!(projection.weeks_needed, 16);
        assert!((projection.normal_phase_weeks - 16.0 / 1.5).abs() < 1e-9);
        assert!((projection.taper_phase_weeks - 4.0).abs() < 1e-9);
        assert_eq!(projection.completion_date, start + Duration::weeks(16));
        assert!(!projection.capped);
    }

    #[test]
    fn test_no_projection_when_gaining() {
        assert!(estimate_completion(150.0, 160.0, 1.0, date(2026, 1, 1)).is_none());
        assert!(estimate_completion(160.0, 160.0, 1.0, date(2026, 1, 1)).is_none());
    }

    #[test]
    fn test_no_projection_without_rate() {
        assert!(estimate_completion(180.0, 160.0, 0.0, date(2026, 1, 1)).is_none());
        assert!(estimate_completion(180.0, 160.0, -1.0, date(2026, 1, 1)).is_none());
        assert!(estimate_completion(180.0, 160.0, f64::NAN, date(2026, 1, 1)).is_none());
    }

    #[test]
    fn test_capped_at_two_years() {
        let start = date(2026, 1, 1);
        let projection = estimate_completion(300.0, 150.0, 0.1, start).unwrap();

        assert_eq!(projection.weeks_needed, MAX_WEEKS);
        assert!(projection.capped);
        assert_eq!(projection.completion_date, start + Duration::weeks(104));
    }

    #[test]
    fn test_small_goal_still_gets_buffer_week() {
        // 1 unit: 0.8 at 2/week = 0.4 weeks, 0.2 at taper = 0.2 weeks -> ceil(0.6) + 1
        let projection = estimate_completion(81.0, 80.0, 2.0, date(2026, 1, 1)).unwrap();
        assert_eq!(projection.weeks_needed, 2);
    }

    #[test]
    fn test_whole_week_total_does_not_round_up() {
        // 3 units at 1/week: 2.4 + 0.6 weeks is exactly 3, so 3 + 1 buffer
        let projection = estimate_completion(83.0, 80.0, 1.0, date(2026, 1, 1)).unwrap();
        assert_eq!(projection.weeks_needed, 4);
        assert_eq!(projection.normal_phase_weeks + projection.taper_phase_weeks, 3.0);
    }
}
