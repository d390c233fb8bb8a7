//! CLI command that runs every stage in sequence.

use super::aggregate::aggregate_tables;
use super::link::link_tables;
use super::resolve_dir;
use super::score::score_tables;
use anyhow::Result;
use clap::Args;
use market_link_core::AppConfig;
use market_link_matching::LinkSummary;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Raw Kalshi settled-markets CSV.
    #[arg(long)]
    pub kalshi: PathBuf,

    /// Raw Polymarket closed-markets CSV.
    #[arg(long)]
    pub polymarket: PathBuf,

    /// Directory for event and link tables (defaults to paths.data_dir).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory for scorer output tables (defaults to paths.scores_dir).
    #[arg(long)]
    pub scores_dir: Option<PathBuf>,
}

/// Aggregates, scores and links in one pass.
///
/// Scorer tables already present in the scores directory, such as semantic
/// scores produced elsewhere, are consolidated together with the fresh
/// lexical ones.
pub fn run_all(args: &RunArgs, config: &AppConfig) -> Result<LinkSummary> {
    let data_dir = resolve_dir(args.data_dir.as_ref(), &config.paths.data_dir);
    let scores_dir = resolve_dir(args.scores_dir.as_ref(), &config.paths.scores_dir);

    info!(stage = "aggregate", "Starting stage");
    let tables = aggregate_tables(&args.kalshi, &args.polymarket, &data_dir, config)?;

    info!(stage = "score", "Starting stage");
    score_tables(&tables, &scores_dir, config)?;

    info!(stage = "link", "Starting stage");
    link_tables(&tables, &data_dir, &scores_dir, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_raw_tables;
    use market_link_core::{Platform, ScoreSource, ScoredPair};
    use market_link_data::{event_table_path, matched_markets_path, scorer_table_path, CsvStorage};
    use tempfile::TempDir;

    fn run_args(dir: &std::path::Path) -> RunArgs {
        let (kalshi, polymarket) = write_raw_tables(dir);
        RunArgs {
            kalshi,
            polymarket,
            data_dir: Some(dir.join("data")),
            scores_dir: Some(dir.join("scores")),
        }
    }

    #[test]
    fn test_run_all_end_to_end() {
        let dir = TempDir::new().unwrap();
        let args = run_args(dir.path());

        let summary = run_all(&args, &AppConfig::default()).unwrap();

        assert_eq!(summary.event_pairs, 1);
        assert_eq!(summary.blank_mode_events, 1);
        assert_eq!(summary.market_pairs, 2);
        assert_eq!(summary.exact_matches, 2);
        assert_eq!(summary.results_agree, 2);

        let data_dir = dir.path().join("data");
        assert!(event_table_path(&data_dir, Platform::Kalshi).exists());
        assert!(event_table_path(&data_dir, Platform::Polymarket).exists());
        assert!(matched_markets_path(&data_dir).exists());
    }

    #[test]
    fn test_run_all_folds_in_external_semantic_scores() {
        let dir = TempDir::new().unwrap();
        let args = run_args(dir.path());

        // A semantic table from another tool proposes a pair the lexical
        // scorers never see because the events share no person.
        let semantic = vec![ScoredPair {
            kalshi_event: "KXNEWSOM-28".to_string(),
            poly_event: "trump-states-2028".to_string(),
            kalshi_title: "will newsom win [blank] in 2028?".to_string(),
            poly_title: "will trump win [blank] in 2028".to_string(),
            score: 0.75,
        }];
        CsvStorage::write_scored_pairs(
            &scorer_table_path(&dir.path().join("scores"), ScoreSource::SemanticTitle),
            &semantic,
        )
        .unwrap();

        let summary = run_all(&args, &AppConfig::default()).unwrap();

        assert_eq!(summary.consolidated_pairs, 2);
        // The poly event's best partner is still the Trump event.
        assert_eq!(summary.event_pairs, 1);
        assert_eq!(summary.market_pairs, 2);
    }
}
