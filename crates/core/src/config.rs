use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub aggregation: AggregationConfig,
    pub blocking: BlockingConfig,
    pub scoring: ScoringConfig,
    pub linking: LinkingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the raw, processed and output tables.
    pub data_dir: String,
    /// Directory holding the four scorer tables.
    pub scores_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            scores_dir: "data/event_matches".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Minimum non-wildcard characters a generalized Kalshi title must keep.
    /// `None` disables the first-title fallback.
    pub kalshi_title_min_content: Option<usize>,
    /// Minimum non-wildcard characters a generalized Polymarket title must keep.
    pub polymarket_title_min_content: Option<usize>,
    /// Shortest token accepted as a person name.
    pub person_min_token_len: usize,
    /// Extra lowercase words never treated as person names.
    pub extra_stop_words: Vec<String>,
    /// Earliest year recognized in event text.
    pub year_min: i32,
    /// Latest year recognized in event text.
    pub year_max: i32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            kalshi_title_min_content: None,
            polymarket_title_min_content: Some(15),
            person_min_token_len: 3,
            extra_stop_words: Vec::new(),
            year_min: 2020,
            year_max: 2039,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingConfig {
    /// Maximum year distance for two events to remain candidates.
    pub year_window: i32,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self { year_window: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Lexical scorers drop pairs below this score (0-100).
    pub lexical_min_score: f64,
    /// Semantic scorers drop pairs below this cosine similarity.
    pub semantic_min_score: f64,
    /// Characters of event text passed to the embedder.
    pub semantic_max_chars: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lexical_min_score: 60.0,
            semantic_min_score: 0.60,
            semantic_max_chars: 512,
        }
    }
}

/// What blank extraction does when the template suffix is not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixMismatchPolicy {
    /// Use the whole remainder after the prefix as the blank.
    #[default]
    KeepRemainder,
    /// Treat the extraction as failed.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkingConfig {
    /// Consolidated event pairs below this normalized score are dropped.
    pub event_score_floor: f64,
    /// Minimum blank-to-blank similarity (0-100) for templated events.
    pub blank_match_threshold: f64,
    /// Minimum title-to-title similarity (0-100) otherwise.
    pub direct_title_threshold: f64,
    /// Blank extraction behavior on suffix mismatch.
    pub suffix_mismatch: SuffixMismatchPolicy,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            event_score_floor: 0.70,
            blank_match_threshold: 85.0,
            direct_title_threshold: 90.0,
            suffix_mismatch: SuffixMismatchPolicy::KeepRemainder,
        }
    }
}

impl AppConfig {
    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range setting.
    pub fn validate(&self) -> Result<()> {
        let linking = &self.linking;
        ensure!(
            (0.0..=1.0).contains(&linking.event_score_floor),
            "linking.event_score_floor must be within [0, 1], got {}",
            linking.event_score_floor
        );
        ensure!(
            (0.0..=100.0).contains(&linking.blank_match_threshold),
            "linking.blank_match_threshold must be within [0, 100], got {}",
            linking.blank_match_threshold
        );
        ensure!(
            (0.0..=100.0).contains(&linking.direct_title_threshold),
            "linking.direct_title_threshold must be within [0, 100], got {}",
            linking.direct_title_threshold
        );
        ensure!(
            (0.0..=100.0).contains(&self.scoring.lexical_min_score),
            "scoring.lexical_min_score must be within [0, 100], got {}",
            self.scoring.lexical_min_score
        );
        ensure!(
            self.scoring.semantic_max_chars > 0,
            "scoring.semantic_max_chars must be positive"
        );
        ensure!(
            self.aggregation.person_min_token_len > 0,
            "aggregation.person_min_token_len must be positive"
        );
        ensure!(
            self.aggregation.year_min <= self.aggregation.year_max,
            "aggregation.year_min ({}) exceeds year_max ({})",
            self.aggregation.year_min,
            self.aggregation.year_max
        );
        ensure!(
            self.blocking.year_window >= 0,
            "blocking.year_window must not be negative"
        );
        Ok(())
    }
}
