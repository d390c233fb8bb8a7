use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use market_link_core::{
    EventRecord, MatchedEventPair, MatchedMarketPair, Platform, ProcessedContract, RawContract,
    ScoreSource, ScoredPair, ScorerOutput,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{KalshiContractRow, PolymarketContractRow};

const PROCESSED_COLUMNS: [&str; 8] = [
    "ticker",
    "event_ticker",
    "title",
    "original_title",
    "result",
    "event_title",
    "event_rules",
    "event_text",
];

const SCORED_COLUMNS: [&str; 5] = [
    "kalshi_event",
    "poly_event",
    "kalshi_title",
    "poly_title",
    "score",
];

const EVENT_PAIR_COLUMNS: [&str; 5] = [
    "kalshi_event",
    "poly_event",
    "score",
    "kalshi_title",
    "poly_title",
];

const MARKET_PAIR_COLUMNS: [&str; 12] = [
    "kalshi_event",
    "poly_event",
    "event_score",
    "kalshi_ticker",
    "poly_ticker",
    "kalshi_title",
    "poly_title",
    "kalshi_blank",
    "poly_blank",
    "kalshi_result",
    "poly_result",
    "market_score",
];

/// Returns the conventional raw-table path for a platform inside `dir`.
#[must_use]
pub fn raw_table_path(dir: &Path, platform: Platform) -> PathBuf {
    dir.join(format!("{}_settled.csv", platform.file_stem()))
}

/// Returns the conventional processed event-table path for a platform inside `dir`.
#[must_use]
pub fn event_table_path(dir: &Path, platform: Platform) -> PathBuf {
    dir.join(format!("{}_events.csv", platform.file_stem()))
}

/// Returns the scorer-table path for a source inside `dir`.
#[must_use]
pub fn scorer_table_path(dir: &Path, source: ScoreSource) -> PathBuf {
    dir.join(format!("{}.csv", source.file_stem()))
}

/// Returns the matched event-pair table path inside `dir`.
#[must_use]
pub fn matched_events_path(dir: &Path) -> PathBuf {
    dir.join("matched_events.csv")
}

/// Returns the matched market-pair table path inside `dir`.
#[must_use]
pub fn matched_markets_path(dir: &Path) -> PathBuf {
    dir.join("matched_markets.csv")
}

/// CSV readers and writers for every pipeline table.
pub struct CsvStorage;

impl CsvStorage {
    /// Reads a raw contract table with the given platform's schema.
    ///
    /// Rows whose result is not yes/no are dropped and counted.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a row fails to parse
    pub fn read_contracts(platform: Platform, path: &Path) -> Result<Vec<RawContract>> {
        let (contracts, total) = match platform {
            Platform::Kalshi => {
                let rows: Vec<KalshiContractRow> = Self::read_rows(path)?;
                let total = rows.len();
                let contracts: Vec<_> = rows
                    .into_iter()
                    .filter_map(KalshiContractRow::into_contract)
                    .collect();
                (contracts, total)
            }
            Platform::Polymarket => {
                let rows: Vec<PolymarketContractRow> = Self::read_rows(path)?;
                let total = rows.len();
                let contracts: Vec<_> = rows
                    .into_iter()
                    .filter_map(PolymarketContractRow::into_contract)
                    .collect();
                (contracts, total)
            }
        };

        let dropped = total - contracts.len();
        if dropped > 0 {
            warn!(%platform, dropped, "Dropped non-binary contracts");
        }
        info!(
            %platform,
            path = %path.display(),
            contracts = contracts.len(),
            "Loaded raw contracts"
        );
        Ok(contracts)
    }

    /// Writes the processed per-contract event table.
    ///
    /// Format: ticker,event_ticker,title,original_title,result,event_title,event_rules,event_text
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_event_table(path: &Path, events: &[EventRecord]) -> Result<()> {
        let rows: Vec<ProcessedContract> = events
            .iter()
            .flat_map(|event| {
                event.contracts.iter().map(move |contract| ProcessedContract {
                    ticker: contract.ticker.clone(),
                    event_ticker: event.event_ticker.clone(),
                    title: contract.title.clone(),
                    original_title: contract.original_title.clone(),
                    result: contract.result,
                    event_title: event.event_title.clone(),
                    event_rules: event.event_rules.clone(),
                    event_text: event.event_text.clone(),
                })
            })
            .collect();

        Self::write_rows(path, &PROCESSED_COLUMNS, &rows)?;
        info!(path = %path.display(), events = events.len(), rows = rows.len(), "Saved event table");
        Ok(())
    }

    /// Reads a processed per-contract event table.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a row fails to parse
    pub fn read_event_table(path: &Path) -> Result<Vec<ProcessedContract>> {
        Self::read_rows(path)
    }

    /// Writes one scorer's pairs.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_scored_pairs(path: &Path, pairs: &[ScoredPair]) -> Result<()> {
        let mut sorted = pairs.to_vec();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self::write_rows(path, &SCORED_COLUMNS, &sorted)?;
        info!(path = %path.display(), pairs = sorted.len(), "Saved scored pairs");
        Ok(())
    }

    /// Reads one scorer's pairs.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a row fails to parse
    pub fn read_scored_pairs(path: &Path) -> Result<Vec<ScoredPair>> {
        Self::read_rows(path)
    }

    /// Loads every scorer table present in `dir`.
    ///
    /// Absent tables are logged and skipped; whether any output at all is
    /// required is up to the consolidation step.
    ///
    /// # Errors
    /// Returns error if a present table cannot be parsed
    pub fn load_scorer_outputs(dir: &Path) -> Result<Vec<ScorerOutput>> {
        let mut outputs = Vec::new();
        for source in ScoreSource::ALL {
            let path = scorer_table_path(dir, source);
            if !path.exists() {
                warn!(%source, path = %path.display(), "Scorer table not found, skipping");
                continue;
            }
            let pairs = Self::read_scored_pairs(&path)?;
            info!(%source, pairs = pairs.len(), "Loaded scorer table");
            outputs.push(ScorerOutput { source, pairs });
        }
        Ok(outputs)
    }

    /// Writes the matched event-pair table.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_event_pairs(path: &Path, pairs: &[MatchedEventPair]) -> Result<()> {
        Self::write_rows(path, &EVENT_PAIR_COLUMNS, pairs)?;
        info!(path = %path.display(), pairs = pairs.len(), "Saved event pairs");
        Ok(())
    }

    /// Writes the matched market-pair table.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_market_pairs(path: &Path, pairs: &[MatchedMarketPair]) -> Result<()> {
        Self::write_rows(path, &MARKET_PAIR_COLUMNS, pairs)?;
        info!(path = %path.display(), pairs = pairs.len(), "Saved market pairs");
        Ok(())
    }

    fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
        let file =
            File::open(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

        reader
            .deserialize()
            .enumerate()
            .map(|(idx, row)| {
                row.with_context(|| format!("Failed to parse row {} of {}", idx + 1, path.display()))
            })
            .collect()
    }

    /// Writes a header and rows to a sibling temp file, then renames it into
    /// place so a failed write never leaves a partial table behind.
    fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("csv.tmp");
        let written = Self::write_csv(&tmp_path, header, rows).and_then(|()| {
            fs::rename(&tmp_path, path)
                .with_context(|| format!("Failed to move {} into place", tmp_path.display()))
        });

        if written.is_err() && tmp_path.exists() {
            if let Err(err) = fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), error = %err, "Failed to remove temp file");
            }
        }
        written
    }

    fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_link_core::{EventContract, Outcome};
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn sample_event() -> EventRecord {
        EventRecord {
            platform: Platform::Kalshi,
            event_ticker: "KXOHIO-28".to_string(),
            event_title: "will trump win [blank] in 2028?".to_string(),
            event_rules: "resolves yes if trump wins".to_string(),
            event_text: "will trump win [blank] in 2028? resolves yes if trump wins".to_string(),
            persons: BTreeSet::from(["trump".to_string()]),
            years: BTreeSet::from([2028]),
            contracts: vec![
                EventContract {
                    ticker: "KXOHIO-28-OH".to_string(),
                    title: "will trump win ohio in 2028?".to_string(),
                    original_title: "Will Trump win Ohio in 2028?".to_string(),
                    result: Outcome::Yes,
                },
                EventContract {
                    ticker: "KXOHIO-28-TX".to_string(),
                    title: "will trump win texas, in 2028?".to_string(),
                    original_title: "Will Trump win Texas, in 2028?".to_string(),
                    result: Outcome::No,
                },
            ],
        }
    }

    #[test]
    fn test_read_kalshi_contracts_drops_non_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kalshi_settled.csv");
        fs::write(
            &path,
            "ticker,event_ticker,title,result,rules_primary,rules_secondary\n\
             K-1,K,Will Trump win Ohio?,yes,\"Resolves Yes\nif he wins\",\n\
             K-2,K,Will Trump win Texas?,no,,\n\
             K-3,K,Will Trump win Utah?,,,\n",
        )
        .unwrap();

        let contracts = CsvStorage::read_contracts(Platform::Kalshi, &path).unwrap();
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].text_fields[0], "Resolves Yes if he wins");
        assert_eq!(contracts[1].result, Outcome::No);
    }

    #[test]
    fn test_event_table_round_trip_preserves_commas() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("kalshi_events.csv");
        CsvStorage::write_event_table(&path, &[sample_event()]).unwrap();

        let rows = CsvStorage::read_event_table(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].title, "will trump win texas, in 2028?");
        assert_eq!(rows[1].original_title, "Will Trump win Texas, in 2028?");
        assert_eq!(rows[0].event_title, "will trump win [blank] in 2028?");
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_load_scorer_outputs_skips_missing() {
        let dir = TempDir::new().unwrap();
        let pairs = vec![ScoredPair {
            kalshi_event: "K".to_string(),
            poly_event: "P".to_string(),
            kalshi_title: "a".to_string(),
            poly_title: "b".to_string(),
            score: 92.0,
        }];
        CsvStorage::write_scored_pairs(
            &scorer_table_path(dir.path(), ScoreSource::FuzzyTitle),
            &pairs,
        )
        .unwrap();

        let outputs = CsvStorage::load_scorer_outputs(dir.path()).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].source, ScoreSource::FuzzyTitle);
        assert_eq!(outputs[0].pairs, pairs);
    }

    #[test]
    fn test_load_scorer_outputs_empty_dir() {
        let dir = TempDir::new().unwrap();
        let outputs = CsvStorage::load_scorer_outputs(dir.path()).unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_empty_tables_still_have_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matched_markets.csv");
        CsvStorage::write_market_pairs(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), MARKET_PAIR_COLUMNS.join(","));
    }

    #[test]
    fn test_market_pairs_write_empty_blanks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matched_markets.csv");
        let pair = MatchedMarketPair {
            kalshi_event: "K".to_string(),
            poly_event: "P".to_string(),
            event_score: 0.92,
            kalshi_ticker: "K-1".to_string(),
            poly_ticker: "p-1".to_string(),
            kalshi_title: "will trump win ohio".to_string(),
            poly_title: "trump wins ohio".to_string(),
            kalshi_blank: None,
            poly_blank: None,
            kalshi_result: Outcome::Yes,
            poly_result: Outcome::Yes,
            market_score: 91.0,
        };
        CsvStorage::write_market_pairs(&path, &[pair]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let data_line = content.lines().nth(1).unwrap();
        assert!(data_line.contains(",,,yes,yes,91"));
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A directory at the target path makes the final rename fail.
        let path = dir.path().join("fuzzy_title.csv");
        fs::create_dir(&path).unwrap();

        let pairs = vec![ScoredPair {
            kalshi_event: "K".to_string(),
            poly_event: "P".to_string(),
            kalshi_title: "a".to_string(),
            poly_title: "b".to_string(),
            score: 90.0,
        }];
        assert!(CsvStorage::write_scored_pairs(&path, &pairs).is_err());
        assert!(!path.with_extension("csv.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_conventional_paths() {
        let dir = Path::new("data");
        assert_eq!(
            raw_table_path(dir, Platform::Polymarket),
            PathBuf::from("data/polymarket_settled.csv")
        );
        assert_eq!(
            event_table_path(dir, Platform::Kalshi),
            PathBuf::from("data/kalshi_events.csv")
        );
        assert_eq!(
            scorer_table_path(dir, ScoreSource::SemanticFull),
            PathBuf::from("data/semantic_full.csv")
        );
        assert_eq!(matched_events_path(dir), PathBuf::from("data/matched_events.csv"));
        assert_eq!(matched_markets_path(dir), PathBuf::from("data/matched_markets.csv"));
    }
}
