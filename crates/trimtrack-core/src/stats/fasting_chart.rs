//! Fasting chart aggregation.
//!
//! Splits fasting intervals across the buckets of a reporting window. Each
//! bucket reports how many seconds of it were spent fasting and how many
//! seconds of it have elapsed so far, so the chart can show fasting against
//! non-fasting time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::CalcContext;
use crate::records::FastingInterval;
use crate::window::{Granularity, ReportView, ReportWindow};

/// One slot of the chart grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingBucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub fasting_seconds: f64,
    /// Seconds of the bucket that lie before "now". Zero for future buckets.
    pub total_elapsed_seconds: f64,
}

impl FastingBucket {
    /// Elapsed time not spent fasting, floored at zero.
    pub fn non_fasting_seconds(&self) -> f64 {
        (self.total_elapsed_seconds - self.fasting_seconds).max(0.0)
    }

    pub fn fasting_hours(&self) -> f64 {
        self.fasting_seconds / 3600.0
    }

    pub fn non_fasting_hours(&self) -> f64 {
        self.non_fasting_seconds() / 3600.0
    }
}

/// A resolved chart: the window, its bucket size and the buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingChart {
    pub view: ReportView,
    pub granularity: Granularity,
    pub window: ReportWindow,
    pub buckets: Vec<FastingBucket>,
}

impl FastingChart {
    /// Resolve `view` at `ctx.now` and aggregate `intervals` into it.
    pub fn build(view: ReportView, intervals: &[FastingInterval], ctx: &CalcContext) -> Self {
        let earliest = intervals.iter().map(|i| i.start).min();
        let window = view.window(ctx, earliest);
        let granularity = view.granularity();
        let buckets = aggregate_fasting(intervals, window, granularity, ctx);

        Self {
            view,
            granularity,
            window,
            buckets,
        }
    }

    pub fn total_fasting_seconds(&self) -> f64 {
        self.buckets.iter().map(|b| b.fasting_seconds).sum()
    }
}

/// Aggregate `intervals` into `granularity`-sized buckets covering `window`.
///
/// Bucket edges follow the local calendar of `ctx`; the first and last bucket
/// are clipped to the window. Open intervals end at `ctx.now`, and nothing
/// after `ctx.now` is counted. Per-bucket fasting time is capped at the
/// bucket's elapsed time so overlapping logs cannot exceed it.
pub fn aggregate_fasting(
    intervals: &[FastingInterval],
    window: ReportWindow,
    granularity: Granularity,
    ctx: &CalcContext,
) -> Vec<FastingBucket> {
    if window.is_empty() {
        return Vec::new();
    }

    let relevant: Vec<&FastingInterval> = intervals
        .iter()
        .filter(|i| i.start < window.end && i.effective_end(ctx.now) > window.start)
        .collect();

    let mut buckets = Vec::new();
    let mut cursor = window.start;

    while cursor < window.end {
        let natural_start = granularity.bucket_start(cursor, ctx);
        let end = match granularity.next_boundary(natural_start, ctx) {
            Some(next) if next > cursor => next.min(window.end),
            _ => window.end,
        };

        let elapsed_ms = (end.min(ctx.now) - cursor).num_milliseconds().max(0);
        let fasting_ms: i64 = relevant
            .iter()
            .map(|i| i.overlap_millis(cursor, end, ctx.now))
            .sum();

        buckets.push(FastingBucket {
            label: granularity.label(natural_start, ctx),
            start: cursor,
            end,
            fasting_seconds: fasting_ms.min(elapsed_ms) as f64 / 1000.0,
            total_elapsed_seconds: elapsed_ms as f64 / 1000.0,
        });

        cursor = end;
    }

    tracing::debug!(
        buckets = buckets.len(),
        intervals = relevant.len(),
        ?granularity,
        "aggregated fasting chart"
    );

    buckets
}
