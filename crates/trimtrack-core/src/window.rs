//! Reporting windows and bucket granularity.
//!
//! The presentation layer picks a view (day, week, month, year or all time).
//! Each view maps to a concrete window in the user's local calendar and to the
//! bucket size used to chart it:
//!
//! | view  | window                        | buckets |
//! |-------|-------------------------------|---------|
//! | day   | today                         | hour    |
//! | week  | current Monday-to-Sunday week | day     |
//! | month | current calendar month        | week    |
//! | year  | current calendar year         | month   |
//! | all   | month of first log until now  | month   |

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::context::CalcContext;
use crate::error::ValidationError;

/// Size of one chart bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
}

/// View selector chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportView {
    Day,
    #[default]
    Week,
    Month,
    Year,
    All,
}

/// Half-open reporting window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn start_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

impl Granularity {
    /// Start of the bucket that contains `ts`.
    pub fn bucket_start(self, ts: DateTime<Utc>, ctx: &CalcContext) -> DateTime<Utc> {
        let local = ctx.local_datetime(ts);
        let date = local.date();
        let floored = match self {
            Granularity::Hour => midnight(date) + Duration::hours(i64::from(local.hour())),
            Granularity::Day => midnight(date),
            Granularity::Week => midnight(start_of_week(date)),
            Granularity::Month => midnight(start_of_month(date)),
        };
        ctx.to_utc(floored)
    }

    /// Start of the bucket after the one starting at `bucket_start`.
    pub fn next_boundary(self, bucket_start: DateTime<Utc>, ctx: &CalcContext) -> Option<DateTime<Utc>> {
        match self {
            Granularity::Hour => bucket_start.checked_add_signed(Duration::hours(1)),
            Granularity::Day => bucket_start.checked_add_signed(Duration::days(1)),
            Granularity::Week => bucket_start.checked_add_signed(Duration::weeks(1)),
            Granularity::Month => {
                let local = ctx.local_datetime(bucket_start);
                let next = local.checked_add_months(Months::new(1))?;
                Some(ctx.to_utc(next))
            }
        }
    }

    /// Chart label for the bucket starting at `bucket_start`.
    pub fn label(self, bucket_start: DateTime<Utc>, ctx: &CalcContext) -> String {
        let local = ctx.local_datetime(bucket_start);
        match self {
            Granularity::Hour => local.format("%H:00").to_string(),
            Granularity::Day => local.format("%a").to_string(),
            Granularity::Week => local.format("%b %d").to_string(),
            Granularity::Month => local.format("%b").to_string(),
        }
    }
}

impl ReportView {
    /// Bucket size used to chart this view.
    pub fn granularity(self) -> Granularity {
        match self {
            ReportView::Day => Granularity::Hour,
            ReportView::Week => Granularity::Day,
            ReportView::Month => Granularity::Week,
            ReportView::Year | ReportView::All => Granularity::Month,
        }
    }

    /// Concrete window for this view at `ctx.now`.
    ///
    /// `earliest` is the start of the oldest log; it only matters for
    /// [`ReportView::All`], which falls back to the current month without it.
    pub fn window(self, ctx: &CalcContext, earliest: Option<DateTime<Utc>>) -> ReportWindow {
        let today = ctx.today();
        let (start, end) = match self {
            ReportView::Day => (today, today.succ_opt()),
            ReportView::Week => {
                let monday = start_of_week(today);
                (monday, monday.checked_add_signed(Duration::weeks(1)))
            }
            ReportView::Month => {
                let first = start_of_month(today);
                (first, first.checked_add_months(Months::new(1)))
            }
            ReportView::Year => {
                let first = start_of_year(today);
                (first, first.checked_add_months(Months::new(12)))
            }
            ReportView::All => {
                let from = earliest
                    .map(|ts| ctx.local_date(ts).min(today))
                    .unwrap_or(today);
                (
                    start_of_month(from),
                    start_of_month(today).checked_add_months(Months::new(1)),
                )
            }
        };

        let start = ctx.start_of_day(start);
        // Only reachable at the far end of chrono's date range
        let end = end.map(|d| ctx.start_of_day(d)).unwrap_or(start);
        ReportWindow { start, end }
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportView::Day => "day",
            ReportView::Week => "week",
            ReportView::Month => "month",
            ReportView::Year => "year",
            ReportView::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportView {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(ReportView::Day),
            "week" => Ok(ReportView::Week),
            "month" => Ok(ReportView::Month),
            "year" => Ok(ReportView::Year),
            "all" => Ok(ReportView::All),
            other => Err(ValidationError::InvalidValue {
                field: "view".into(),
                message: format!("expected day, week, month, year or all, got '{other}'"),
            }),
        }
    }
}
