use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;
use trimtrack_core::boundary::{periods_from_json, weight_logs_from_json};
use trimtrack_core::{active_period, Config, GoalProgress, Period, Projection};

use super::{check_rejected, read_export, EvalArgs};

#[derive(Subcommand)]
pub enum PeriodAction {
    /// Progress and projection for the period active today
    Progress {
        /// JSON array of periods
        periods: PathBuf,
        /// JSON array of weigh-ins; the latest one is the current weight
        weights: PathBuf,
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        eval: EvalArgs,
    },
}

#[derive(Serialize)]
struct PeriodReport<'a> {
    period: &'a Period,
    progress: Option<GoalProgress>,
    projection: Option<Projection>,
}

pub fn run(action: PeriodAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        PeriodAction::Progress {
            periods,
            weights,
            strict,
            eval,
        } => {
            let ctx = eval.context(&config)?;
            let periods = periods_from_json(&read_export(&periods)?, &ctx)?;
            check_rejected(&periods, strict)?;
            let samples = weight_logs_from_json(&read_export(&weights)?, &ctx)?;
            check_rejected(&samples, strict)?;

            let period = active_period(&periods.records, ctx.today())
                .ok_or_else(|| format!("no period active on {}", ctx.today()))?;

            // Samples are sorted by date; ignore any logged after "now"
            let latest = samples.records.iter().rev().find(|s| s.date <= ctx.now);

            let projection = if config.charts.show_projection {
                period.projection()
            } else {
                None
            };

            let report = PeriodReport {
                period,
                progress: latest.map(|s| period.progress(s.weight)),
                projection,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
