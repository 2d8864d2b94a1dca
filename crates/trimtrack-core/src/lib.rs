//! # Trimtrack Core Library
//!
//! This library provides the calculations behind the Trimtrack health
//! tracker: fasting charts, fasting streaks, weight trends and goal
//! projections. Records are fetched and stored by the hosted backend; this
//! crate only computes over them, so every calculator is a pure function of
//! its inputs and an explicit [`CalcContext`].
//!
//! ## Architecture
//!
//! - **Boundary**: normalises loosely typed exported records into typed ones
//! - **Records**: fasting intervals, weigh-ins and weight periods
//! - **Stats**: fasting chart aggregation, streak/summary and weight trend
//! - **Projection**: heuristic completion date for a weight-loss goal
//! - **Storage**: TOML-based user configuration
//!
//! ## Key Components
//!
//! - [`aggregate_fasting`]: per-bucket fasting time for a reporting window
//! - [`summarize_fasting`]: current streak, longest and average fast
//! - [`estimate_completion`]: two-phase weight projection
//! - [`Config`]: application configuration management

pub mod boundary;
pub mod context;
pub mod error;
pub mod projection;
pub mod records;
pub mod stats;
pub mod storage;
pub mod units;
pub mod window;

pub use context::CalcContext;
pub use error::{ConfigError, CoreError, ValidationError};
pub use projection::{estimate_completion, Projection};
pub use records::{active_period, FastingInterval, GoalProgress, Period, PeriodKind, WeightSample};
pub use stats::{
    aggregate_fasting, current_streak, summarize_fasting, summarize_weights, FastingBucket,
    FastingChart, FastingSummary, WeightTrend,
};
pub use storage::Config;
pub use units::UnitSystem;
pub use window::{Granularity, ReportView, ReportWindow};
