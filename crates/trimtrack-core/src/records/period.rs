//! Weight-loss and maintenance periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::projection::{estimate_completion, Projection};

/// Kind of phase a period represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    WeightLoss,
    Maintenance,
}

/// A user-defined phase with a weight goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: Uuid,
    pub kind: PeriodKind,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub start_weight: f64,
    pub target_weight: f64,
    /// Desired loss per week, in the same unit as the weights.
    pub weekly_rate: f64,
}

/// How far a period's goal has been reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub current_weight: f64,
    /// Weight lost since the period started (negative when gained).
    pub lost: f64,
    /// Distance still to go to the target, never negative.
    pub remaining: f64,
    /// Share of the goal reached, 0-100. Maintenance periods report 100 while
    /// at or below target.
    pub percent_complete: f64,
}

impl Period {
    pub fn new(
        kind: PeriodKind,
        start_date: NaiveDate,
        start_weight: f64,
        target_weight: f64,
        weekly_rate: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start_date,
            end_date: None,
            start_weight,
            target_weight,
            weekly_rate,
        }
    }

    /// Whether `date` falls within the period (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }

    /// Projected completion for weight-loss periods. Maintenance periods never
    /// project.
    pub fn projection(&self) -> Option<Projection> {
        match self.kind {
            PeriodKind::WeightLoss => estimate_completion(
                self.start_weight,
                self.target_weight,
                self.weekly_rate,
                self.start_date,
            ),
            PeriodKind::Maintenance => None,
        }
    }

    /// Progress towards the target at `current_weight`.
    pub fn progress(&self, current_weight: f64) -> GoalProgress {
        let lost = self.start_weight - current_weight;
        let remaining = (current_weight - self.target_weight).max(0.0);
        let goal = self.start_weight - self.target_weight;

        let percent_complete = if goal > 0.0 {
            (lost / goal * 100.0).clamp(0.0, 100.0)
        } else if current_weight <= self.target_weight {
            100.0
        } else {
            0.0
        };

        GoalProgress {
            current_weight,
            lost,
            remaining,
            percent_complete,
        }
    }
}

/// The period covering `date`. When several overlap, the most recently
/// started one wins.
pub fn active_period(periods: &[Period], date: NaiveDate) -> Option<&Period> {
    periods
        .iter()
        .filter(|p| p.contains(date))
        .max_by_key(|p| p.start_date)
}
