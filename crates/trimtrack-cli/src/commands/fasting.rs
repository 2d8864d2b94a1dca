use clap::Subcommand;
use std::path::PathBuf;
use trimtrack_core::boundary::fasting_logs_from_json;
use trimtrack_core::{summarize_fasting, Config, FastingChart, ReportView};

use super::{check_rejected, read_export, EvalArgs};

#[derive(Subcommand)]
pub enum FastingAction {
    /// Fasting time per bucket for a reporting view
    Chart {
        /// JSON array of fasting logs
        file: PathBuf,
        /// day, week, month, year or all (defaults to charts.default_view)
        #[arg(long)]
        view: Option<ReportView>,
        /// Fail instead of skipping malformed records
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        eval: EvalArgs,
    },
    /// Current streak, longest and average fast
    Summary {
        /// JSON array of fasting logs
        file: PathBuf,
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        eval: EvalArgs,
    },
}

pub fn run(action: FastingAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        FastingAction::Chart {
            file,
            view,
            strict,
            eval,
        } => {
            let ctx = eval.context(&config)?;
            let logs = fasting_logs_from_json(&read_export(&file)?, &ctx)?;
            check_rejected(&logs, strict)?;

            let view = view.unwrap_or(config.charts.default_view);
            let chart = FastingChart::build(view, &logs.records, &ctx);
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        FastingAction::Summary { file, strict, eval } => {
            let ctx = eval.context(&config)?;
            let logs = fasting_logs_from_json(&read_export(&file)?, &ctx)?;
            check_rejected(&logs, strict)?;

            let summary = summarize_fasting(&logs.records, &ctx);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
