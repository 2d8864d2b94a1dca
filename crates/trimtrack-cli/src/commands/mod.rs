pub mod config;
pub mod fasting;
pub mod period;
pub mod project;
pub mod weight;

use chrono::{DateTime, Utc};
use std::path::Path;
use trimtrack_core::boundary::{DateInput, Normalized};
use trimtrack_core::{CalcContext, Config};

/// Options shared by every command that reads exported logs.
#[derive(clap::Args)]
pub struct EvalArgs {
    /// Evaluate as of this instant instead of now (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub now: Option<String>,
    /// Override the configured UTC offset, in minutes east of UTC
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

impl EvalArgs {
    /// Build the calculation context from the config and the overrides.
    pub fn context(&self, config: &Config) -> Result<CalcContext, Box<dyn std::error::Error>> {
        let offset = self.utc_offset.unwrap_or(config.display.utc_offset_minutes);
        let base = CalcContext::with_offset_minutes(Utc::now(), offset)?;

        let now: DateTime<Utc> = match &self.now {
            Some(text) => trimtrack_core::boundary::parse_timestamp(
                &DateInput::Text(text.clone()),
                "now",
                &base,
            )?,
            None => base.now,
        };
        Ok(CalcContext::new(now, base.offset))
    }
}

/// Read a JSON export from disk.
pub fn read_export(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

/// Report rejected records on stderr, or fail when `strict`.
pub fn check_rejected<T>(
    normalized: &Normalized<T>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if normalized.rejected.is_empty() {
        return Ok(());
    }
    if strict {
        let first = &normalized.rejected[0];
        return Err(format!(
            "{} record(s) rejected; first at index {}: {}",
            normalized.rejected.len(),
            first.index,
            first.reason
        )
        .into());
    }
    for rejected in &normalized.rejected {
        eprintln!("skipped record {}: {}", rejected.index, rejected.reason);
    }
    Ok(())
}
