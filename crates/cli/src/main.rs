use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{AggregateArgs, LinkArgs, RunArgs, ScoreArgs};

#[derive(Parser)]
#[command(name = "market-link")]
#[command(about = "Link equivalent Kalshi and Polymarket events and contracts", long_about = None)]
struct Cli {
    /// Config file path (defaults to config/Link.toml)
    #[arg(short, long, global = true, env = "MARKET_LINK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate raw contract tables into per-platform event tables
    Aggregate(AggregateArgs),
    /// Block and score candidate event pairs with the lexical scorers
    Score(ScoreArgs),
    /// Consolidate scores, match events and contracts, write link tables
    Link(LinkArgs),
    /// Run aggregate, score and link in sequence
    Run(RunArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Aggregate(args) => commands::run_aggregate(&args, &config)?,
        Commands::Score(args) => commands::run_score(&args, &config)?,
        Commands::Link(args) => {
            commands::run_link(&args, &config)?;
        }
        Commands::Run(args) => {
            commands::run_all(&args, &config)?;
        }
    }

    Ok(())
}
