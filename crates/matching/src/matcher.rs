//! Contract matching within a matched event pair.
//!
//! Once two events are linked, their contracts are paired one-to-one. When
//! both event titles are wildcard templates the comparison runs on the blank
//! fills ("ohio" vs "ohio"); otherwise whole contract titles are compared
//! under a stricter threshold.

use crate::blank_fill::extract_blank;
use crate::mutual_best::mutual_best;
use crate::similarity::{TextSimilarity, TokenSortRatio};
use market_link_core::{
    EventContract, EventRecord, LinkingConfig, MatchedEventPair, MatchedMarketPair,
    SuffixMismatchPolicy,
};
use tracing::debug;

// =============================================================================
// Match Configuration
// =============================================================================

/// Configuration for contract matching.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum blank-to-blank similarity (0-100) in blank-fill mode.
    pub blank_match_threshold: f64,

    /// Minimum title-to-title similarity (0-100) in direct-title mode.
    pub direct_title_threshold: f64,

    /// Blank extraction behavior when a title misses the template suffix.
    pub suffix_mismatch: SuffixMismatchPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::from(&LinkingConfig::default())
    }
}

impl From<&LinkingConfig> for MatchConfig {
    fn from(config: &LinkingConfig) -> Self {
        Self {
            blank_match_threshold: config.blank_match_threshold,
            direct_title_threshold: config.direct_title_threshold,
            suffix_mismatch: config.suffix_mismatch,
        }
    }
}

impl MatchConfig {
    /// Creates a strict configuration: exact fills only, suffixes required.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            blank_match_threshold: 100.0,
            direct_title_threshold: 100.0,
            suffix_mismatch: SuffixMismatchPolicy::Reject,
        }
    }

    /// Sets the blank-fill threshold.
    #[must_use]
    pub fn with_blank_threshold(mut self, threshold: f64) -> Self {
        self.blank_match_threshold = threshold;
        self
    }

    /// Sets the direct-title threshold.
    #[must_use]
    pub fn with_title_threshold(mut self, threshold: f64) -> Self {
        self.direct_title_threshold = threshold;
        self
    }
}

// =============================================================================
// Match Results
// =============================================================================

/// How contracts of an event pair were compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketMatchMode {
    /// Both event titles are templates; blank fills are compared.
    BlankFill,
    /// Full contract titles are compared.
    DirectTitle,
}

/// Result of matching the contracts of one event pair.
#[derive(Debug, Clone)]
pub struct MarketMatchOutcome {
    /// Comparison mode used.
    pub mode: MarketMatchMode,
    /// Pairs at or above threshold before mutual-best filtering.
    pub candidates: usize,
    /// Surviving one-to-one contract pairs.
    pub pairs: Vec<MatchedMarketPair>,
}

/// A contract with its extracted blank fill.
struct ContractItem<'a> {
    contract: &'a EventContract,
    blank: Option<String>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// =============================================================================
// Market Matcher
// =============================================================================

/// Pairs the contracts of linked events.
#[derive(Debug, Clone)]
pub struct MarketMatcher<S: TextSimilarity = TokenSortRatio> {
    config: MatchConfig,
    similarity: S,
}

impl MarketMatcher {
    /// Creates a matcher with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    /// Creates a matcher with custom configuration.
    #[must_use]
    pub fn with_config(config: MatchConfig) -> Self {
        Self::with_similarity(config, TokenSortRatio)
    }
}

impl Default for MarketMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TextSimilarity> MarketMatcher<S> {
    /// Creates a matcher with a custom similarity function.
    pub fn with_similarity(config: MatchConfig, similarity: S) -> Self {
        Self { config, similarity }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns the comparison mode for two events.
    #[must_use]
    pub fn mode_for(kalshi: &EventRecord, poly: &EventRecord) -> MarketMatchMode {
        if kalshi.is_templated() && poly.is_templated() {
            MarketMatchMode::BlankFill
        } else {
            MarketMatchMode::DirectTitle
        }
    }

    fn items<'a>(&self, event: &'a EventRecord, mode: MarketMatchMode) -> Vec<ContractItem<'a>> {
        event
            .contracts
            .iter()
            .map(|contract| ContractItem {
                contract,
                blank: match mode {
                    MarketMatchMode::BlankFill => extract_blank(
                        &event.event_title,
                        &contract.title,
                        self.config.suffix_mismatch,
                    ),
                    MarketMatchMode::DirectTitle => None,
                },
            })
            .collect()
    }

    /// Scores the full contract cross product of an event pair, keeps pairs
    /// at or above the mode's threshold, then filters to mutual best.
    ///
    /// In blank-fill mode, contracts whose fill cannot be extracted are
    /// excluded.
    #[must_use]
    pub fn match_event_pair(
        &self,
        event_pair: &MatchedEventPair,
        kalshi: &EventRecord,
        poly: &EventRecord,
    ) -> MarketMatchOutcome {
        let mode = Self::mode_for(kalshi, poly);
        let threshold = match mode {
            MarketMatchMode::BlankFill => self.config.blank_match_threshold,
            MarketMatchMode::DirectTitle => self.config.direct_title_threshold,
        };

        let kalshi_items = self.items(kalshi, mode);
        let poly_items = self.items(poly, mode);

        let mut candidates = Vec::new();
        for k in &kalshi_items {
            for p in &poly_items {
                let score = match mode {
                    MarketMatchMode::BlankFill => match (&k.blank, &p.blank) {
                        (Some(kb), Some(pb)) => self.similarity.similarity(kb, pb),
                        _ => continue,
                    },
                    MarketMatchMode::DirectTitle => self
                        .similarity
                        .similarity(&k.contract.title, &p.contract.title),
                };
                if score < threshold {
                    continue;
                }

                candidates.push(MatchedMarketPair {
                    kalshi_event: event_pair.kalshi_event.clone(),
                    poly_event: event_pair.poly_event.clone(),
                    event_score: round_to(event_pair.score, 4),
                    kalshi_ticker: k.contract.ticker.clone(),
                    poly_ticker: p.contract.ticker.clone(),
                    kalshi_title: k.contract.title.clone(),
                    poly_title: p.contract.title.clone(),
                    kalshi_blank: k.blank.clone(),
                    poly_blank: p.blank.clone(),
                    kalshi_result: k.contract.result,
                    poly_result: p.contract.result,
                    market_score: round_to(score, 2),
                });
            }
        }

        let candidate_count = candidates.len();
        let pairs = mutual_best(candidates);
        debug!(
            kalshi_event = %event_pair.kalshi_event,
            poly_event = %event_pair.poly_event,
            ?mode,
            candidates = candidate_count,
            matched = pairs.len(),
            "Matched contracts"
        );

        MarketMatchOutcome {
            mode,
            candidates: candidate_count,
            pairs,
        }
    }
}
