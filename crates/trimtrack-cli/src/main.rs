use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "trimtrack-cli", version, about = "Trimtrack CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fasting charts and statistics
    Fasting {
        #[command(subcommand)]
        action: commands::fasting::FastingAction,
    },
    /// Weight trend statistics
    Weight {
        #[command(subcommand)]
        action: commands::weight::WeightAction,
    },
    /// Weight period goals
    Period {
        #[command(subcommand)]
        action: commands::period::PeriodAction,
    },
    /// Project when a target weight will be reached
    Project(commands::project::ProjectArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TRIMTRACK_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Fasting { action } => commands::fasting::run(action),
        Commands::Weight { action } => commands::weight::run(action),
        Commands::Period { action } => commands::period::run(action),
        Commands::Project(args) => commands::project::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
