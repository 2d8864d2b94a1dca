//! Evaluation context shared by the calculators.
//!
//! Every calculation that depends on "now" or on calendar boundaries takes a
//! [`CalcContext`] instead of reading the system clock or a global locale.
//! This keeps the calculators pure and lets tests pin the clock.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

use crate::error::ValidationError;

/// The evaluation instant plus the user's UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcContext {
    /// Instant treated as "now": open fasts end here, later buckets are future.
    pub now: DateTime<Utc>,
    /// Offset that defines local calendar days, weeks and months.
    pub offset: FixedOffset,
}

impl CalcContext {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Context evaluated in UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    /// Build a context from an offset expressed in minutes east of UTC.
    ///
    /// # Errors
    /// Returns an error if the offset is outside +/- 24 hours.
    pub fn with_offset_minutes(
        now: DateTime<Utc>,
        offset_minutes: i32,
    ) -> Result<Self, ValidationError> {
        let offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "utc_offset_minutes".into(),
                message: format!("{offset_minutes} is out of range"),
            })?;
        Ok(Self { now, offset })
    }

    /// Local calendar date of an instant.
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Local wall-clock time of an instant.
    pub fn local_datetime(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        ts.with_timezone(&self.offset).naive_local()
    }

    /// Today's local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    /// Convert a local wall-clock time back to UTC.
    pub fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        (local - Duration::seconds(i64::from(self.offset.local_minus_utc()))).and_utc()
    }

    /// UTC instant of local midnight at the start of `date`.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        self.to_utc(date.and_time(NaiveTime::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_respects_offset() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap();
        let utc = CalcContext::utc(now);
        let plus_two = CalcContext::with_offset_minutes(now, 120).unwrap();

        assert_eq!(utc.today(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(plus_two.today(), NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
    }

    #[test]
    fn test_start_of_day_round_trips() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let ctx = CalcContext::with_offset_minutes(now, -300).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let midnight = ctx.start_of_day(day);
        assert_eq!(midnight, Utc.with_ymd_and_hms(2026, 3, 10, 5, 0, 0).unwrap());
        assert_eq!(ctx.local_date(midnight), day);
    }

    #[test]
    fn test_offset_out_of_range() {
        let now = Utc::now();
        assert!(CalcContext::with_offset_minutes(now, 24 * 60).is_err());
        assert!(CalcContext::with_offset_minutes(now, i32::MAX).is_err());
    }
}
