//! CLI command that blocks and scores candidate event pairs.

use super::{resolve_dir, EventTables};
use anyhow::{Context, Result};
use clap::Args;
use market_link_core::{AppConfig, ScorerOutput};
use market_link_data::{scorer_table_path, CsvStorage};
use market_link_matching::{LexicalScorer, LinkPipeline};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the score command.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Directory holding the processed event tables (defaults to paths.data_dir).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory for scorer output tables (defaults to paths.scores_dir).
    #[arg(long)]
    pub scores_dir: Option<PathBuf>,
}

/// Runs the score command.
pub fn run_score(args: &ScoreArgs, config: &AppConfig) -> Result<()> {
    let data_dir = resolve_dir(args.data_dir.as_ref(), &config.paths.data_dir);
    let scores_dir = resolve_dir(args.scores_dir.as_ref(), &config.paths.scores_dir);

    let tables = EventTables::load(&data_dir, config)?;
    score_tables(&tables, &scores_dir, config)?;
    Ok(())
}

/// Scores the candidate pairs of `tables` with the lexical scorers and
/// writes one table per scorer into `scores_dir`.
///
/// Semantic scorers need an embedding model and are fed in by writing their
/// tables into the same directory.
pub(crate) fn score_tables(
    tables: &EventTables,
    scores_dir: &Path,
    config: &AppConfig,
) -> Result<Vec<ScorerOutput>> {
    fs::create_dir_all(scores_dir)
        .with_context(|| format!("Failed to create {}", scores_dir.display()))?;

    let pipeline = LinkPipeline::from_config(config);
    let [title, full_text] = LexicalScorer::standard_pair(&config.scoring);
    let outputs = pipeline.score(&tables.kalshi, &tables.poly, &[&title, &full_text]);

    for output in &outputs {
        let path = scorer_table_path(scores_dir, output.source);
        CsvStorage::write_scored_pairs(&path, &output.pairs)?;
        info!(
            source = %output.source,
            pairs = output.pairs.len(),
            path = %path.display(),
            "Wrote scorer table"
        );
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::aggregate::aggregate_tables;
    use crate::commands::test_support::write_raw_tables;
    use market_link_core::ScoreSource;
    use tempfile::TempDir;

    #[test]
    fn test_score_writes_lexical_tables() {
        let dir = TempDir::new().unwrap();
        let (kalshi, polymarket) = write_raw_tables(dir.path());
        let config = AppConfig::default();
        aggregate_tables(&kalshi, &polymarket, dir.path(), &config).unwrap();

        let scores_dir = dir.path().join("scores");
        let args = ScoreArgs {
            data_dir: Some(dir.path().to_path_buf()),
            scores_dir: Some(scores_dir.clone()),
        };
        run_score(&args, &config).unwrap();

        let outputs = CsvStorage::load_scorer_outputs(&scores_dir).unwrap();
        let sources: Vec<ScoreSource> = outputs.iter().map(|o| o.source).collect();
        assert_eq!(sources, vec![ScoreSource::FuzzyTitle, ScoreSource::FuzzyFull]);
    }

    #[test]
    fn test_score_only_pairs_sharing_a_person() {
        let dir = TempDir::new().unwrap();
        let (kalshi, polymarket) = write_raw_tables(dir.path());
        let config = AppConfig::default();
        let tables = aggregate_tables(&kalshi, &polymarket, dir.path(), &config).unwrap();

        let outputs = score_tables(&tables, &dir.path().join("scores"), &config).unwrap();
        for output in &outputs {
            assert!(output
                .pairs
                .iter()
                .all(|p| p.kalshi_event == "KXTRUMP-28" && p.poly_event == "trump-states-2028"));
        }
    }

    #[test]
    fn test_score_requires_event_tables() {
        let dir = TempDir::new().unwrap();
        let args = ScoreArgs {
            data_dir: Some(dir.path().to_path_buf()),
            scores_dir: Some(dir.path().join("scores")),
        };
        assert!(run_score(&args, &AppConfig::default()).is_err());
    }
}
