use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;
use trimtrack_core::boundary::{periods_from_json, weight_logs_from_json};
use trimtrack_core::{active_period, summarize_weights, Config, UnitSystem, WeightTrend};

use super::{check_rejected, read_export, EvalArgs};

#[derive(Subcommand)]
pub enum WeightAction {
    /// First, latest and extreme weights plus the weekly rate of change
    Summary {
        /// JSON array of weigh-ins
        file: PathBuf,
        /// Restrict to the period active today, read from this JSON array
        #[arg(long)]
        periods: Option<PathBuf>,
        /// Unit the weights were logged in (defaults to display.units)
        #[arg(long)]
        logged_in: Option<UnitSystem>,
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        eval: EvalArgs,
    },
}

#[derive(Serialize)]
struct WeightReport {
    units: UnitSystem,
    latest: String,
    /// Most recent waist measurement in the selected range, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_waist: Option<String>,
    trend: WeightTrend,
}

fn convert(trend: WeightTrend, to: UnitSystem, from: UnitSystem) -> WeightTrend {
    let c = |v: f64| to.convert_weight(v, from);
    WeightTrend {
        first_weight: c(trend.first_weight),
        latest_weight: c(trend.latest_weight),
        lowest_weight: c(trend.lowest_weight),
        highest_weight: c(trend.highest_weight),
        total_change: c(trend.total_change),
        weekly_change: trend.weekly_change.map(c),
        trend_weight: c(trend.trend_weight),
        ..trend
    }
}

pub fn run(action: WeightAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        WeightAction::Summary {
            file,
            periods,
            logged_in,
            strict,
            eval,
        } => {
            let ctx = eval.context(&config)?;
            let samples = weight_logs_from_json(&read_export(&file)?, &ctx)?;
            check_rejected(&samples, strict)?;

            let periods = match periods {
                Some(path) => {
                    let periods = periods_from_json(&read_export(&path)?, &ctx)?;
                    check_rejected(&periods, strict)?;
                    periods.records
                }
                None => Vec::new(),
            };
            let period = active_period(&periods, ctx.today());

            let units = config.display.units;
            let logged_in = logged_in.unwrap_or(units);
            let trend = summarize_weights(&samples.records, period, &ctx)
                .ok_or("no weigh-ins to summarize")?;
            let trend = convert(trend, units, logged_in);

            // Records are sorted by date, so the last match is the newest
            let latest_waist = samples
                .records
                .iter()
                .filter(|s| period.map_or(true, |p| p.contains(ctx.local_date(s.date))))
                .filter_map(|s| s.waist)
                .last()
                .map(|waist| units.format_length(units.convert_length(waist, logged_in)));

            let report = WeightReport {
                units,
                latest: units.format_weight(trend.latest_weight),
                latest_waist,
                trend,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
