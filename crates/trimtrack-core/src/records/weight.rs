//! Body-weight log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weigh-in. Weights are unit-agnostic; the configured unit system
/// only affects display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    pub date: DateTime<Utc>,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WeightSample {
    pub fn new(date: DateTime<Utc>, weight: f64) -> Self {
        Self {
            date,
            weight,
            body_fat_pct: None,
            waist: None,
            note: None,
        }
    }
}

/// Sort samples by date, oldest first. Samples with equal dates keep their
/// input order.
pub fn sort_by_date(samples: &mut [WeightSample]) {
    samples.sort_by_key(|s| s.date);
}
