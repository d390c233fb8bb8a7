//! Shared record types for cross-platform market linking.
//!
//! This module defines the tables that flow between the pipeline stages:
//! raw contracts as loaded from each platform, the aggregated event records,
//! scorer outputs, and the final event- and market-pair tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reserved wildcard token marking the variable span of a generalized template.
pub const BLANK_MARKER: &str = "[blank]";

// =============================================================================
// Platform Identifiers
// =============================================================================

/// Identifies which platform a contract or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    /// Kalshi prediction market.
    Kalshi,
    /// Polymarket.
    Polymarket,
}

impl Platform {
    /// Returns the display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kalshi => "Kalshi",
            Self::Polymarket => "Polymarket",
        }
    }

    /// Returns the lowercase stem used in file names.
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Kalshi => "kalshi",
            Self::Polymarket => "polymarket",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Contract Outcome
// =============================================================================

/// Settled result of a binary contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Resolved YES.
    Yes,
    /// Resolved NO.
    No,
}

impl Outcome {
    /// Parses a platform result string. Anything other than yes/no is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    /// Returns the lowercase string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Contracts and Events
// =============================================================================

/// One binary contract as retrieved from a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContract {
    /// Platform-unique contract ticker.
    pub ticker: String,
    /// Ticker of the event this contract belongs to.
    pub event_ticker: String,
    /// Contract title, case preserved.
    pub title: String,
    /// Settled result.
    pub result: Outcome,
    /// Free-text rule/description fields, in platform schema order.
    pub text_fields: Vec<String>,
}

/// A contract as carried inside its aggregated event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContract {
    /// Platform-unique contract ticker.
    pub ticker: String,
    /// Normalized title, comparable with the event template.
    pub title: String,
    /// Title as retrieved, used for person extraction.
    pub original_title: String,
    /// Settled result.
    pub result: Outcome,
}

/// One semantic record per (platform, event ticker).
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Platform the event was listed on.
    pub platform: Platform,
    /// Event ticker.
    pub event_ticker: String,
    /// Generalized title; may contain [`BLANK_MARKER`].
    pub event_title: String,
    /// Generalized rule/description text.
    pub event_rules: String,
    /// Title and rules concatenated.
    pub event_text: String,
    /// Lowercase candidate person-name tokens.
    pub persons: BTreeSet<String>,
    /// Four-digit years mentioned in the event text.
    pub years: BTreeSet<i32>,
    /// Contracts of the event, in input order.
    pub contracts: Vec<EventContract>,
}

impl EventRecord {
    /// Returns true if the event title is a wildcard template.
    #[must_use]
    pub fn is_templated(&self) -> bool {
        self.event_title.contains(BLANK_MARKER)
    }
}

/// Persisted per-contract row of the cleaned/generalized event table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedContract {
    pub ticker: String,
    pub event_ticker: String,
    pub title: String,
    pub original_title: String,
    pub result: Outcome,
    pub event_title: String,
    pub event_rules: String,
    pub event_text: String,
}

// =============================================================================
// Scoring
// =============================================================================

/// Identity of one of the four event-level scoring strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Embedding similarity of event titles.
    SemanticTitle,
    /// Embedding similarity of full event text.
    SemanticFull,
    /// Token-sort similarity of event titles.
    FuzzyTitle,
    /// Token-sort similarity of full event text.
    FuzzyFull,
}

impl ScoreSource {
    /// All sources, in consolidation order.
    pub const ALL: [ScoreSource; 4] = [
        Self::SemanticTitle,
        Self::SemanticFull,
        Self::FuzzyTitle,
        Self::FuzzyFull,
    ];

    /// Returns the file stem of this source's scorer table.
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::SemanticTitle => "semantic_title",
            Self::SemanticFull => "semantic_full",
            Self::FuzzyTitle => "fuzzy_title",
            Self::FuzzyFull => "fuzzy_full",
        }
    }

    /// Returns true for sources scoring on the 0-100 lexical scale.
    #[must_use]
    pub fn is_lexical(self) -> bool {
        matches!(self, Self::FuzzyTitle | Self::FuzzyFull)
    }

    /// Divisor that maps this source's native scale onto [0, 1].
    #[must_use]
    pub fn scale(self) -> f64 {
        if self.is_lexical() {
            100.0
        } else {
            1.0
        }
    }
}

impl std::fmt::Display for ScoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// A candidate event pair with one scorer's native-scale score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPair {
    pub kalshi_event: String,
    pub poly_event: String,
    pub kalshi_title: String,
    pub poly_title: String,
    pub score: f64,
}

/// All pairs produced by one scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerOutput {
    /// Scorer that produced the pairs.
    pub source: ScoreSource,
    /// Scored pairs on the scorer's native scale.
    pub pairs: Vec<ScoredPair>,
}

/// The best normalized score for one unique event pair across all scorers.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedPair {
    pub kalshi_event: String,
    pub poly_event: String,
    pub kalshi_title: String,
    pub poly_title: String,
    /// Normalized score in [0, 1].
    pub score: f64,
    /// Scorer that produced the winning score.
    pub source: ScoreSource,
}

// =============================================================================
// Link Outputs
// =============================================================================

/// Event pair that survived mutual-best filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEventPair {
    pub kalshi_event: String,
    pub poly_event: String,
    /// Normalized event score in [0, 1].
    pub score: f64,
    pub kalshi_title: String,
    pub poly_title: String,
}

/// Contract pair matched within one matched event pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedMarketPair {
    pub kalshi_event: String,
    pub poly_event: String,
    pub event_score: f64,
    pub kalshi_ticker: String,
    pub poly_ticker: String,
    pub kalshi_title: String,
    pub poly_title: String,
    pub kalshi_blank: Option<String>,
    pub poly_blank: Option<String>,
    pub kalshi_result: Outcome,
    pub poly_result: Outcome,
    /// Lexical similarity on the 0-100 scale.
    pub market_score: f64,
}

impl MatchedMarketPair {
    /// Returns true if both contracts settled the same way.
    #[must_use]
    pub fn results_agree(&self) -> bool {
        self.kalshi_result == self.poly_result
    }
}
