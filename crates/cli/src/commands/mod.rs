//! CLI commands for the market link pipeline.

pub mod aggregate;
pub mod link;
pub mod run;
pub mod score;

pub use aggregate::{run_aggregate, AggregateArgs};
pub use link::{run_link, LinkArgs};
pub use run::{run_all, RunArgs};
pub use score::{run_score, ScoreArgs};

use anyhow::{Context, Result};
use market_link_core::{AppConfig, ConfigLoader, EventRecord, Platform};
use market_link_data::{event_table_path, CsvStorage};
use market_link_matching::EventAggregator;
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    info!(
        data_dir = %config.paths.data_dir,
        scores_dir = %config.paths.scores_dir,
        "Loaded configuration"
    );
    Ok(config)
}

/// Picks a command-line directory override over the configured default.
fn resolve_dir(flag: Option<&PathBuf>, configured: &str) -> PathBuf {
    flag.cloned().unwrap_or_else(|| PathBuf::from(configured))
}

/// Aggregated events for both platforms.
#[derive(Debug, Clone, Default)]
pub struct EventTables {
    pub kalshi: Vec<EventRecord>,
    pub poly: Vec<EventRecord>,
}

impl EventTables {
    /// Rebuilds both platforms' events from the processed tables in `data_dir`.
    pub fn load(data_dir: &Path, config: &AppConfig) -> Result<Self> {
        let aggregator = EventAggregator::standard(&config.aggregation)
            .context("Failed to build event aggregator")?;

        let load = |platform: Platform| -> Result<Vec<EventRecord>> {
            let path = event_table_path(data_dir, platform);
            let rows = CsvStorage::read_event_table(&path)
                .with_context(|| format!("Run `market-link aggregate` first ({} missing or invalid)", path.display()))?;
            Ok(aggregator.rebuild(platform, rows))
        };

        Ok(Self {
            kalshi: load(Platform::Kalshi)?,
            poly: load(Platform::Polymarket)?,
        })
    }
}
