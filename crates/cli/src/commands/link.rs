//! CLI command that consolidates scores and writes the link tables.

use super::{resolve_dir, EventTables};
use anyhow::Result;
use clap::Args;
use market_link_core::AppConfig;
use market_link_data::{matched_events_path, matched_markets_path, CsvStorage};
use market_link_matching::{LinkError, LinkPipeline, LinkSummary};
use std::path::{Path, PathBuf};

/// Arguments for the link command.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Directory holding the processed event tables; link tables are
    /// written here too (defaults to paths.data_dir).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding scorer output tables (defaults to paths.scores_dir).
    #[arg(long)]
    pub scores_dir: Option<PathBuf>,
}

/// Runs the link command.
pub fn run_link(args: &LinkArgs, config: &AppConfig) -> Result<LinkSummary> {
    let data_dir = resolve_dir(args.data_dir.as_ref(), &config.paths.data_dir);
    let scores_dir = resolve_dir(args.scores_dir.as_ref(), &config.paths.scores_dir);

    let tables = EventTables::load(&data_dir, config)?;
    link_tables(&tables, &data_dir, &scores_dir, config)
}

/// Consolidates every scorer table in `scores_dir`, matches events and
/// contracts, and writes both link tables into `data_dir`.
pub(crate) fn link_tables(
    tables: &EventTables,
    data_dir: &Path,
    scores_dir: &Path,
    config: &AppConfig,
) -> Result<LinkSummary> {
    let outputs = CsvStorage::load_scorer_outputs(scores_dir)?;
    if outputs.is_empty() {
        return Err(LinkError::no_scorer_output(scores_dir.display().to_string()).into());
    }

    let pipeline = LinkPipeline::from_config(config);
    let consolidated = pipeline.consolidate(outputs)?;
    let report = pipeline.link(consolidated, &tables.kalshi, &tables.poly);

    CsvStorage::write_event_pairs(&matched_events_path(data_dir), &report.event_pairs)?;
    CsvStorage::write_market_pairs(&matched_markets_path(data_dir), &report.market_pairs)?;

    report.summary.log();
    Ok(report.summary)
}
