//! Fasting intervals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One fasting session. `end == None` means the fast is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastingInterval {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl FastingInterval {
    /// Create a completed fast.
    ///
    /// # Errors
    /// Returns an error if `end` is before `start`.
    pub fn completed(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Create a fast that is still in progress.
    pub fn open(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// End used for aggregation: the recorded end, or `now` for an open fast.
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }

    /// Duration of a completed fast. `None` while the fast is open.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }

    /// Elapsed time at `now`, counting an open fast up to `now`.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (self.effective_end(now) - self.start).max(Duration::zero())
    }

    /// Milliseconds of this fast that fall inside `[from, to)`, with an open
    /// fast ending at `now`.
    pub fn overlap_millis(&self, from: DateTime<Utc>, to: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let start = self.start.max(from);
        let end = self.effective_end(now).min(to).min(now);
        (end - start).num_milliseconds().max(0)
    }
}
