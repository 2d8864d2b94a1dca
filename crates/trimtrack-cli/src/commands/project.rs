use chrono::NaiveDate;
use clap::Args;
use trimtrack_core::{estimate_completion, Config};

use super::EvalArgs;

#[derive(Args)]
pub struct ProjectArgs {
    /// Weight at the start of the period
    #[arg(long)]
    pub start_weight: f64,
    /// Goal weight
    #[arg(long)]
    pub target_weight: f64,
    /// Planned loss per week, in the same unit
    #[arg(long)]
    pub rate: f64,
    /// First day of the period (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
    #[command(flatten)]
    pub eval: EvalArgs,
}

pub fn run(args: ProjectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let ctx = args.eval.context(&config)?;
    let start_date = args.start_date.unwrap_or_else(|| ctx.today());

    match estimate_completion(args.start_weight, args.target_weight, args.rate, start_date) {
        Some(projection) => println!("{}", serde_json::to_string_pretty(&projection)?),
        None => println!("null"),
    }
    Ok(())
}
