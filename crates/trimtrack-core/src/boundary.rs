//! Normalisation of exported records.
//!
//! Exports from the hosted database are loosely typed: timestamps show up as
//! RFC 3339 strings, naive local date-times, bare dates or epoch
//! milliseconds, and numbers sometimes arrive as strings. Everything is
//! converted here, once, into the typed records in [`crate::records`]. The
//! calculators never see the raw shapes.
//!
//! Rules:
//! - every array element is read on its own, so one malformed element never
//!   fails the whole import;
//! - a missing or unparseable `start`/`date` rejects the record;
//! - a missing, empty or unparseable fasting `end` leaves the fast open;
//! - an `end` before its `start` rejects the record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::CalcContext;
use crate::error::{CoreError, ValidationError};
use crate::records::{FastingInterval, Period, PeriodKind, WeightSample};

/// A date-like value as found in exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// Milliseconds since the Unix epoch with a fractional part.
    FractionalMillis(f64),
    Text(String),
    /// Any other JSON shape, such as a wrapped `{"seconds": ..}` timestamp.
    Other(serde_json::Value),
}

/// A number that may have been exported as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFastingLog {
    #[serde(alias = "start_time")]
    pub start: Option<DateInput>,
    #[serde(default, alias = "end_time")]
    pub end: Option<DateInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeightLog {
    #[serde(alias = "logged_at", alias = "created_at")]
    pub date: Option<DateInput>,
    pub weight: Option<NumberInput>,
    #[serde(default)]
    pub body_fat_pct: Option<NumberInput>,
    #[serde(default)]
    pub waist: Option<NumberInput>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPeriod {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default, alias = "type")]
    pub kind: Option<serde_json::Value>,
    pub start_date: Option<DateInput>,
    #[serde(default)]
    pub end_date: Option<DateInput>,
    pub start_weight: Option<NumberInput>,
    pub target_weight: Option<NumberInput>,
    #[serde(default)]
    pub weekly_rate: Option<NumberInput>,
}

/// A record that could not be normalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// Position in the input array.
    pub index: usize,
    pub reason: String,
}

/// Normalised records plus the ones that were dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedRecord>,
}

impl<T> Normalized<T> {
    /// Parse a JSON array, converting each element independently.
    fn from_json<R: DeserializeOwned>(
        json: &str,
        mut convert: impl FnMut(R) -> Result<T, ValidationError>,
    ) -> Result<Self, CoreError> {
        let elements: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut records = Vec::with_capacity(elements.len());
        let mut rejected = Vec::new();
        for (index, element) in elements.into_iter().enumerate() {
            let converted = serde_json::from_value::<R>(element)
                .map_err(|e| ValidationError::InvalidValue {
                    field: "record".into(),
                    message: e.to_string(),
                })
                .and_then(&mut convert);
            match converted {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(index, error = %err, "rejected record");
                    rejected.push(RejectedRecord {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }
        Ok(Self { records, rejected })
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn invalid_timestamp(field: &str, value: impl ToString) -> ValidationError {
    ValidationError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Read `{"seconds": s, "nanoseconds": n}` style wrappers, with or without
/// leading underscores on the keys.
fn wrapped_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let obj = value.as_object()?;
    let field = |name: &str| obj.get(name).or_else(|| obj.get(&format!("_{name}")));

    let seconds = field("seconds")?.as_i64()?;
    let nanos = match field("nanoseconds") {
        Some(n) => u32::try_from(n.as_u64()?).ok()?,
        None => 0,
    };
    DateTime::from_timestamp(seconds, nanos)
}

/// Interpret a date-like value as an instant. Values without an offset are
/// read as local time in `ctx.offset`; bare dates mean local midnight.
///
/// # Errors
/// Returns an error if the value matches none of the accepted shapes.
pub fn parse_timestamp(
    input: &DateInput,
    field: &str,
    ctx: &CalcContext,
) -> Result<DateTime<Utc>, ValidationError> {
    match input {
        DateInput::Millis(ms) => {
            DateTime::from_timestamp_millis(*ms).ok_or_else(|| invalid_timestamp(field, ms))
        }
        DateInput::FractionalMillis(ms) => {
            let micros = (ms * 1000.0).round();
            if !micros.is_finite() || micros.abs() > i64::MAX as f64 {
                return Err(invalid_timestamp(field, ms));
            }
            DateTime::from_timestamp_micros(micros as i64).ok_or_else(|| invalid_timestamp(field, ms))
        }
        DateInput::Other(value) => {
            wrapped_timestamp(value).ok_or_else(|| invalid_timestamp(field, value))
        }
        DateInput::Text(text) => {
            let text = text.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Ok(dt.with_timezone(&Utc));
            }
            for format in NAIVE_DATETIME_FORMATS {
                if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                    return Ok(ctx.to_utc(naive));
                }
            }
            if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return Ok(ctx.start_of_day(date));
            }
            Err(invalid_timestamp(field, text))
        }
    }
}

/// Interpret a date-like value as a local calendar date.
///
/// # Errors
/// Returns an error if the value matches none of the accepted shapes.
pub fn parse_date(input: &DateInput, field: &str, ctx: &CalcContext) -> Result<NaiveDate, ValidationError> {
    if let DateInput::Text(text) = input {
        if let Ok(date) = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
            return Ok(date);
        }
    }
    parse_timestamp(input, field, ctx).map(|ts| ctx.local_date(ts))
}

/// Interpret a numeric value.
///
/// # Errors
/// Returns an error for non-numeric text and non-finite numbers.
pub fn parse_number(input: &NumberInput, field: &str) -> Result<f64, ValidationError> {
    let value = match input {
        NumberInput::Number(n) => *n,
        NumberInput::Text(text) => text.trim().parse::<f64>().map_err(|_| ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("'{text}' is not a number"),
        })?,
        NumberInput::Other(other) => {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("{other} is not a number"),
            })
        }
    };
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "must be finite".into(),
        });
    }
    Ok(value)
}

fn required<'a, T>(value: &'a Option<T>, field: &str) -> Result<&'a T, ValidationError> {
    value.as_ref().ok_or_else(|| ValidationError::InvalidValue {
        field: field.to_string(),
        message: "missing".into(),
    })
}

fn period_kind(kind: &Option<serde_json::Value>) -> Result<PeriodKind, ValidationError> {
    let value = required(kind, "kind")?;
    serde_json::from_value(value.clone()).map_err(|_| ValidationError::InvalidValue {
        field: "kind".into(),
        message: format!("expected weight_loss or maintenance, got {value}"),
    })
}

fn optional_number(input: &Option<NumberInput>, field: &str) -> Result<Option<f64>, ValidationError> {
    input.as_ref().map(|n| parse_number(n, field)).transpose()
}

/// Normalise one fasting log.
///
/// # Errors
/// Returns an error for a missing or unparseable start, or an end before the
/// start.
pub fn normalize_fasting_log(raw: &RawFastingLog, ctx: &CalcContext) -> Result<FastingInterval, ValidationError> {
    let start = parse_timestamp(required(&raw.start, "start")?, "start", ctx)?;

    let end = match &raw.end {
        None => None,
        Some(DateInput::Text(text)) if text.trim().is_empty() => None,
        Some(input) => match parse_timestamp(input, "end", ctx) {
            Ok(end) => Some(end),
            Err(err) => {
                tracing::warn!(error = %err, "treating fast with unreadable end as open");
                None
            }
        },
    };

    match end {
        Some(end) => FastingInterval::completed(start, end),
        None => Ok(FastingInterval::open(start)),
    }
}

/// Normalise one weigh-in.
///
/// # Errors
/// Returns an error for a missing or unparseable date or weight.
pub fn normalize_weight_log(raw: &RawWeightLog, ctx: &CalcContext) -> Result<WeightSample, ValidationError> {
    Ok(WeightSample {
        date: parse_timestamp(required(&raw.date, "date")?, "date", ctx)?,
        weight: parse_number(required(&raw.weight, "weight")?, "weight")?,
        body_fat_pct: optional_number(&raw.body_fat_pct, "body_fat_pct")?,
        waist: optional_number(&raw.waist, "waist")?,
        note: raw.note.clone(),
    })
}

/// Normalise one period. A missing weekly rate reads as zero.
///
/// # Errors
/// Returns an error for missing or unparseable fields, or an end date before
/// the start date.
pub fn normalize_period(raw: &RawPeriod, ctx: &CalcContext) -> Result<Period, ValidationError> {
    let kind = period_kind(&raw.kind)?;
    let start_date = parse_date(required(&raw.start_date, "start_date")?, "start_date", ctx)?;
    let end_date = raw
        .end_date
        .as_ref()
        .map(|d| parse_date(d, "end_date", ctx))
        .transpose()?;

    if let Some(end) = end_date {
        if end < start_date {
            return Err(ValidationError::InvalidValue {
                field: "end_date".into(),
                message: format!("{end} is before start date {start_date}"),
            });
        }
    }

    Ok(Period {
        id: raw.id.unwrap_or_else(Uuid::new_v4),
        kind,
        start_date,
        end_date,
        start_weight: parse_number(required(&raw.start_weight, "start_weight")?, "start_weight")?,
        target_weight: parse_number(required(&raw.target_weight, "target_weight")?, "target_weight")?,
        weekly_rate: optional_number(&raw.weekly_rate, "weekly_rate")?.unwrap_or(0.0),
    })
}

/// Parse a JSON array of fasting logs.
///
/// # Errors
/// Returns an error if the text is not a JSON array.
pub fn fasting_logs_from_json(json: &str, ctx: &CalcContext) -> Result<Normalized<FastingInterval>, CoreError> {
    Normalized::from_json(json, |raw: RawFastingLog| normalize_fasting_log(&raw, ctx))
}

/// Parse a JSON array of weigh-ins. The result is sorted by date.
///
/// # Errors
/// Returns an error if the text is not a JSON array.
pub fn weight_logs_from_json(json: &str, ctx: &CalcContext) -> Result<Normalized<WeightSample>, CoreError> {
    let mut normalized =
        Normalized::from_json(json, |raw: RawWeightLog| normalize_weight_log(&raw, ctx))?;
    crate::records::sort_by_date(&mut normalized.records);
    Ok(normalized)
}

/// Parse a JSON array of periods.
///
/// # Errors
/// Returns an error if the text is not a JSON array.
pub fn periods_from_json(json: &str, ctx: &CalcContext) -> Result<Normalized<Period>, CoreError> {
    Normalized::from_json(json, |raw: RawPeriod| normalize_period(&raw, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx() -> CalcContext {
        CalcContext::with_offset_minutes(Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap(), 120).unwrap()
    }

    #[test]
    fn test_timestamp_shapes() {
        let ctx = ctx();
        let expected = Utc.with_ymd_and_hms(2026, 5, 30, 6, 0, 0).unwrap();

        let inputs = [
            DateInput::Text("2026-05-30T06:00:00Z".into()),
            DateInput::Text("2026-05-30T08:00:00+02:00".into()),
            DateInput::Text("2026-05-30 08:00:00".into()),
            DateInput::Text("2026-05-30T08:00".into()),
            DateInput::Millis(expected.timestamp_millis()),
        ];
        for input in &inputs {
            assert_eq!(parse_timestamp(input, "start", &ctx).unwrap(), expected, "{input:?}");
        }

        let midnight = parse_timestamp(&DateInput::Text("2026-05-30".into()), "start", &ctx).unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2026, 5, 29, 22, 0, 0).unwrap());

        assert!(parse_timestamp(&DateInput::Text("yesterday".into()), "start", &ctx).is_err());
    }

    #[test]
    fn test_unreadable_end_leaves_fast_open() {
        let raw = RawFastingLog {
            start: Some(DateInput::Text("2026-05-30T06:00:00Z".into())),
            end: Some(DateInput::Text("not a date".into())),
        };
        let fast = normalize_fasting_log(&raw, &ctx()).unwrap();
        assert!(fast.is_open());

        let blank = RawFastingLog {
            start: raw.start.clone(),
            end: Some(DateInput::Text("  ".into())),
        };
        assert!(normalize_fasting_log(&blank, &ctx()).unwrap().is_open());
    }

    #[test]
    fn test_inverted_fast_rejected() {
        let json = r#"[
            {"start_time": "2026-05-30T06:00:00Z", "end_time": "2026-05-30T22:00:00Z"},
            {"start": "2026-05-30T06:00:00Z", "end": "2026-05-29T22:00:00Z"},
            {"end": "2026-05-29T22:00:00Z"}
        ]"#;

        let normalized = fasting_logs_from_json(json, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.rejected.len(), 2);
        assert_eq!(normalized.rejected[0].index, 1);
        assert_eq!(normalized.rejected[1].index, 2);
    }

    #[test]
    fn test_weights_accept_string_numbers_and_sort() {
        let json = r#"[
            {"date": "2026-05-20", "weight": "180.5"},
            {"logged_at": "2026-05-10T07:00:00Z", "weight": 182, "body_fat_pct": "24.1"},
            {"date": "2026-05-21", "weight": "heavy"}
        ]"#;

        let normalized = weight_logs_from_json(json, &ctx()).unwrap();
        assert_eq!(normalized.rejected.len(), 1);
        assert_eq!(normalized.records[0].weight, 182.0);
        assert_eq!(normalized.records[0].body_fat_pct, Some(24.1));
        assert_eq!(normalized.records[1].weight, 180.5);
    }

    #[test]
    fn test_periods() {
        let json = r#"[
            {"type": "weight_loss", "start_date": "2026-01-05", "start_weight": 180, "target_weight": 160, "weekly_rate": "1.5"},
            {"kind": "maintenance", "start_date": "2026-05-01", "start_weight": 160, "target_weight": 160},
            {"kind": "weight_loss", "start_date": "2026-05-01", "end_date": "2026-04-01", "start_weight": 160, "target_weight": 150}
        ]"#;

        let normalized = periods_from_json(json, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.rejected.len(), 1);
        assert_eq!(normalized.records[0].weekly_rate, 1.5);
        assert_eq!(normalized.records[1].weekly_rate, 0.0);
        assert_eq!(normalized.records[0].projection().map(|p| p.weeks_needed), Some(16));
    }

    #[test]
    fn test_wrapped_and_fractional_timestamps() {
        let ctx = ctx();
        let expected = Utc.with_ymd_and_hms(2026, 5, 31, 6, 0, 0).unwrap();

        let wrapped = DateInput::Other(serde_json::json!({"seconds": expected.timestamp()}));
        assert_eq!(parse_timestamp(&wrapped, "end", &ctx).unwrap(), expected);

        let underscored = DateInput::Other(
            serde_json::json!({"_seconds": expected.timestamp(), "_nanoseconds": 500_000_000}),
        );
        assert_eq!(
            parse_timestamp(&underscored, "end", &ctx).unwrap(),
            expected + chrono::Duration::milliseconds(500)
        );

        let fractional = DateInput::FractionalMillis(expected.timestamp_millis() as f64 + 0.5);
        assert_eq!(
            parse_timestamp(&fractional, "end", &ctx).unwrap(),
            expected + chrono::Duration::microseconds(500)
        );

        assert!(parse_timestamp(&DateInput::Other(serde_json::json!(true)), "end", &ctx).is_err());
        assert!(parse_timestamp(&DateInput::Other(serde_json::json!({"when": 1})), "end", &ctx).is_err());
    }

    #[test]
    fn test_odd_shapes_do_not_fail_the_import() {
        let json = r#"[
            {"start": "2026-05-30T06:00:00Z", "end": "2026-05-30T20:00:00Z"},
            {"start": "2026-05-31T06:00:00Z", "end": {"seconds": 1780207200}},
            {"start": "2026-05-31T06:00:00Z", "end": 1780250400000.0},
            {"start": "2026-05-31T06:00:00Z", "end": true},
            {"start": {"nested": "2026-05-31"}},
            {"start": false},
            42
        ]"#;

        let normalized = fasting_logs_from_json(json, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 4);
        assert_eq!(normalized.records[1].end, Some(Utc.with_ymd_and_hms(2026, 5, 31, 6, 0, 0).unwrap()));
        assert_eq!(normalized.records[2].end, Some(Utc.with_ymd_and_hms(2026, 5, 31, 18, 0, 0).unwrap()));
        // Unreadable end leaves the fast open
        assert!(normalized.records[3].is_open());

        let indexes: Vec<_> = normalized.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![4, 5, 6]);
    }

    #[test]
    fn test_odd_number_shapes_reject_only_that_record() {
        let json = r#"[
            {"date": "2026-05-20", "weight": 180.5},
            {"date": "2026-05-21", "weight": [180]},
            {"date": "2026-05-22", "weight": 180, "waist": {"cm": 90}}
        ]"#;

        let normalized = weight_logs_from_json(json, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.rejected.len(), 2);
        assert!(normalized.rejected[0].reason.contains("weight"));
    }

    #[test]
    fn test_unknown_period_kind_rejects_only_that_period() {
        let json = r#"[
            {"kind": "weight_loss", "start_date": "2026-01-05", "start_weight": 180, "target_weight": 160, "weekly_rate": 1},
            {"kind": "bulk", "start_date": "2026-03-01", "start_weight": 160, "target_weight": 170},
            {"kind": 7, "start_date": "2026-03-01", "start_weight": 160, "target_weight": 170},
            {"start_date": "2026-03-01", "start_weight": 160, "target_weight": 170}
        ]"#;

        let normalized = periods_from_json(json, &ctx()).unwrap();
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.records[0].kind, PeriodKind::WeightLoss);
        let indexes: Vec<_> = normalized.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert!(normalized.rejected[0].reason.contains("bulk"));
    }

    #[test]
    fn test_not_an_array() {
        assert!(fasting_logs_from_json("{}", &ctx()).is_err());
    }
}
