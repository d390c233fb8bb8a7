//! End-to-end linking: blocking, scoring, consolidation, event matching and
//! contract matching.

use crate::blocking::{BlockingIndex, CandidatePair};
use crate::consolidate::ScoreConsolidator;
use crate::error::Result;
use crate::matcher::{MarketMatchMode, MarketMatcher, MatchConfig};
use crate::mutual_best::mutual_best;
use crate::scoring::PairScorer;
use crate::similarity::{TextSimilarity, TokenSortRatio};
use market_link_core::{
    AppConfig, ConsolidatedPair, EventRecord, MatchedEventPair, MatchedMarketPair, ScorerOutput,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

// =============================================================================
// Link Summary
// =============================================================================

/// Counts describing one link run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSummary {
    /// Unique event pairs above the consolidation floor.
    pub consolidated_pairs: usize,
    /// Event pairs surviving mutual-best filtering.
    pub event_pairs: usize,
    /// Event pairs matched on blank fills.
    pub blank_mode_events: usize,
    /// Event pairs matched on full titles.
    pub direct_mode_events: usize,
    /// Event pairs skipped because an event table lacked one side.
    pub skipped_events: usize,
    /// Contract pairs matched.
    pub market_pairs: usize,
    /// Contract pairs scoring exactly 100.
    pub exact_matches: usize,
    /// Contract pairs scoring 90 up to but excluding 100.
    pub high_matches: usize,
    /// Remaining contract pairs.
    pub other_matches: usize,
    /// Contract pairs whose Yes/No results agree.
    pub results_agree: usize,
}

impl LinkSummary {
    /// Fraction of contract pairs whose results agree, if any pairs exist.
    #[must_use]
    pub fn agreement_rate(&self) -> Option<f64> {
        (self.market_pairs > 0).then(|| self.results_agree as f64 / self.market_pairs as f64)
    }

    fn record_market_pairs(&mut self, pairs: &[MatchedMarketPair]) {
        self.market_pairs = pairs.len();
        for pair in pairs {
            if pair.market_score >= 100.0 {
                self.exact_matches += 1;
            } else if pair.market_score >= 90.0 {
                self.high_matches += 1;
            } else {
                self.other_matches += 1;
            }
            if pair.results_agree() {
                self.results_agree += 1;
            }
        }
    }

    /// Emits the summary as one structured log line.
    pub fn log(&self) {
        info!(
            consolidated_pairs = self.consolidated_pairs,
            event_pairs = self.event_pairs,
            blank_mode = self.blank_mode_events,
            direct_mode = self.direct_mode_events,
            skipped = self.skipped_events,
            market_pairs = self.market_pairs,
            exact = self.exact_matches,
            high = self.high_matches,
            other = self.other_matches,
            results_agree = self.results_agree,
            agreement_pct = self.agreement_rate().map_or(0.0, |r| (r * 1000.0).round() / 10.0),
            "Link summary"
        );
    }
}

/// Output tables of a link run.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    /// Matched event pairs, by score descending.
    pub event_pairs: Vec<MatchedEventPair>,
    /// Matched contract pairs, by market score descending.
    pub market_pairs: Vec<MatchedMarketPair>,
    /// Counts for the run.
    pub summary: LinkSummary,
}

// =============================================================================
// Link Pipeline
// =============================================================================

/// Runs the linking stages with one set of thresholds.
#[derive(Debug, Clone)]
pub struct LinkPipeline<S: TextSimilarity = TokenSortRatio> {
    year_window: i32,
    consolidator: ScoreConsolidator,
    matcher: MarketMatcher<S>,
}

impl LinkPipeline {
    /// Creates a pipeline from application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.blocking.year_window,
            ScoreConsolidator::new(config.linking.event_score_floor),
            MarketMatcher::with_config(MatchConfig::from(&config.linking)),
        )
    }
}

impl<S: TextSimilarity> LinkPipeline<S> {
    /// Creates a pipeline from its parts.
    pub fn new(year_window: i32, consolidator: ScoreConsolidator, matcher: MarketMatcher<S>) -> Self {
        Self {
            year_window,
            consolidator,
            matcher,
        }
    }

    /// Candidate event pairs from the blocking index.
    #[must_use]
    pub fn candidates(&self, kalshi: &[EventRecord], poly: &[EventRecord]) -> Vec<CandidatePair> {
        BlockingIndex::build(poly, self.year_window).candidates(kalshi)
    }

    /// Blocks once and runs every scorer over the same candidates.
    #[must_use]
    pub fn score(
        &self,
        kalshi: &[EventRecord],
        poly: &[EventRecord],
        scorers: &[&dyn PairScorer],
    ) -> Vec<ScorerOutput> {
        let candidates = self.candidates(kalshi, poly);
        scorers
            .iter()
            .map(|scorer| ScorerOutput {
                source: scorer.source(),
                pairs: scorer.score_pairs(kalshi, poly, &candidates),
            })
            .collect()
    }

    /// Merges scorer outputs into one best score per event pair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LinkError::NoScorerOutput`] if `outputs` is empty.
    pub fn consolidate(&self, outputs: Vec<ScorerOutput>) -> Result<Vec<ConsolidatedPair>> {
        self.consolidator.consolidate(outputs)
    }

    /// Filters consolidated pairs to mutual best and matches the contracts
    /// of every surviving event pair.
    ///
    /// Event titles come from the event tables, falling back to the scorer
    /// titles. Pairs whose events are missing from a table are skipped.
    #[must_use]
    pub fn link(
        &self,
        consolidated: Vec<ConsolidatedPair>,
        kalshi: &[EventRecord],
        poly: &[EventRecord],
    ) -> LinkReport {
        let kalshi_by_ticker: HashMap<&str, &EventRecord> =
            kalshi.iter().map(|e| (e.event_ticker.as_str(), e)).collect();
        let poly_by_ticker: HashMap<&str, &EventRecord> =
            poly.iter().map(|e| (e.event_ticker.as_str(), e)).collect();

        let mut summary = LinkSummary {
            consolidated_pairs: consolidated.len(),
            ..LinkSummary::default()
        };

        let mut event_pairs: Vec<MatchedEventPair> = mutual_best(consolidated)
            .into_iter()
            .map(|pair| {
                let kalshi_title = kalshi_by_ticker
                    .get(pair.kalshi_event.as_str())
                    .map_or(pair.kalshi_title, |e| e.event_title.clone());
                let poly_title = poly_by_ticker
                    .get(pair.poly_event.as_str())
                    .map_or(pair.poly_title, |e| e.event_title.clone());
                MatchedEventPair {
                    kalshi_event: pair.kalshi_event,
                    poly_event: pair.poly_event,
                    score: pair.score,
                    kalshi_title,
                    poly_title,
                }
            })
            .collect();
        event_pairs.sort_by(|a, b| b.score.total_cmp(&a.score));
        summary.event_pairs = event_pairs.len();

        let mut market_pairs = Vec::new();
        for event_pair in &event_pairs {
            let (Some(k), Some(p)) = (
                kalshi_by_ticker.get(event_pair.kalshi_event.as_str()),
                poly_by_ticker.get(event_pair.poly_event.as_str()),
            ) else {
                debug!(
                    kalshi_event = %event_pair.kalshi_event,
                    poly_event = %event_pair.poly_event,
                    "Skipping event pair missing from event tables"
                );
                summary.skipped_events += 1;
                continue;
            };

            let outcome = self.matcher.match_event_pair(event_pair, k, p);
            match outcome.mode {
                MarketMatchMode::BlankFill => summary.blank_mode_events += 1,
                MarketMatchMode::DirectTitle => summary.direct_mode_events += 1,
            }
            market_pairs.extend(outcome.pairs);
        }
        market_pairs.sort_by(|a, b| b.market_score.total_cmp(&a.market_score));
        summary.record_market_pairs(&market_pairs);

        LinkReport {
            event_pairs,
            market_pairs,
            summary,
        }
    }
}
