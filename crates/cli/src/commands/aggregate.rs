//! CLI command that turns raw contract tables into event tables.

use super::{resolve_dir, EventTables};
use anyhow::{Context, Result};
use clap::Args;
use market_link_core::{AppConfig, EventRecord, Platform};
use market_link_data::{event_table_path, CsvStorage};
use market_link_matching::EventAggregator;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the aggregate command.
#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Raw Kalshi settled-markets CSV.
    #[arg(long)]
    pub kalshi: PathBuf,

    /// Raw Polymarket closed-markets CSV.
    #[arg(long)]
    pub polymarket: PathBuf,

    /// Directory for the processed event tables (defaults to paths.data_dir).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Runs the aggregate command.
pub fn run_aggregate(args: &AggregateArgs, config: &AppConfig) -> Result<()> {
    let out_dir = resolve_dir(args.out_dir.as_ref(), &config.paths.data_dir);
    aggregate_tables(&args.kalshi, &args.polymarket, &out_dir, config)?;
    Ok(())
}

/// Aggregates both raw tables and writes the processed tables into `out_dir`.
pub(crate) fn aggregate_tables(
    kalshi_path: &Path,
    poly_path: &Path,
    out_dir: &Path,
    config: &AppConfig,
) -> Result<EventTables> {
    let aggregator = EventAggregator::standard(&config.aggregation)
        .context("Failed to build event aggregator")?;

    let aggregate_one = |platform: Platform, path: &Path| -> Result<Vec<EventRecord>> {
        let contracts = CsvStorage::read_contracts(platform, path)?;
        let events = aggregator.aggregate(platform, &contracts);
        CsvStorage::write_event_table(&event_table_path(out_dir, platform), &events)?;
        Ok(events)
    };

    let tables = EventTables {
        kalshi: aggregate_one(Platform::Kalshi, kalshi_path)?,
        poly: aggregate_one(Platform::Polymarket, poly_path)?,
    };

    info!(
        kalshi_events = tables.kalshi.len(),
        poly_events = tables.poly.len(),
        out_dir = %out_dir.display(),
        "Aggregation complete"
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_raw_tables;
    use tempfile::TempDir;

    #[test]
    fn test_aggregate_writes_event_tables() {
        let dir = TempDir::new().unwrap();
        let (kalshi, polymarket) = write_raw_tables(dir.path());
        let out_dir = dir.path().join("out");
        let args = AggregateArgs {
            kalshi,
            polymarket,
            out_dir: Some(out_dir.clone()),
        };

        run_aggregate(&args, &AppConfig::default()).unwrap();

        let kalshi_rows =
            CsvStorage::read_event_table(&event_table_path(&out_dir, Platform::Kalshi)).unwrap();
        assert_eq!(kalshi_rows.len(), 4);
        assert!(kalshi_rows
            .iter()
            .any(|r| r.event_title == "will trump win [blank] in 2028?"));

        let poly_rows =
            CsvStorage::read_event_table(&event_table_path(&out_dir, Platform::Polymarket))
                .unwrap();
        assert_eq!(poly_rows.len(), 2);
    }

    #[test]
    fn test_aggregate_round_trips_through_event_tables() {
        let dir = TempDir::new().unwrap();
        let (kalshi, polymarket) = write_raw_tables(dir.path());
        let config = AppConfig::default();

        let aggregated = aggregate_tables(&kalshi, &polymarket, dir.path(), &config).unwrap();
        let reloaded = EventTables::load(dir.path(), &config).unwrap();

        assert_eq!(reloaded.kalshi, aggregated.kalshi);
        assert_eq!(reloaded.poly, aggregated.poly);
    }

    #[test]
    fn test_aggregate_missing_input() {
        let dir = TempDir::new().unwrap();
        let args = AggregateArgs {
            kalshi: dir.path().join("missing.csv"),
            polymarket: dir.path().join("missing.csv"),
            out_dir: Some(dir.path().to_path_buf()),
        };
        assert!(run_aggregate(&args, &AppConfig::default()).is_err());
    }
}
