//! Statistics module for Trimtrack
//!
//! Pure calculators over log records: the fasting chart aggregator, fasting
//! streak and summary statistics, and the weight trend summary.

mod fasting_chart;
mod fasting_summary;
mod weight_trend;

pub use fasting_chart::{aggregate_fasting, FastingBucket, FastingChart};

pub use fasting_summary::{current_streak, summarize_fasting, FastingSummary, STREAK_LOOKBACK_DAYS};

pub use weight_trend::{summarize_weights, WeightTrend, TREND_WINDOW_DAYS};
