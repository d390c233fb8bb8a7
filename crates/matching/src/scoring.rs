//! Event-pair scorers.
//!
//! Every scorer sees the same candidate list from the blocking index and
//! returns pairs on its own native scale (0-100 for lexical, cosine for
//! semantic). Normalization happens later in consolidation.

use crate::blocking::CandidatePair;
use crate::similarity::{TextSimilarity, TokenSortRatio};
use market_link_core::{EventRecord, ScoreSource, ScoredPair, ScoringConfig};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Which event text a scorer compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// The generalized event title.
    Title,
    /// Title and rules concatenated.
    FullText,
}

impl TextField {
    /// Returns the selected text of `event`.
    #[must_use]
    pub fn of(self, event: &EventRecord) -> &str {
        match self {
            Self::Title => &event.event_title,
            Self::FullText => &event.event_text,
        }
    }
}

/// Scores candidate event pairs.
pub trait PairScorer: Send + Sync {
    /// Identity of the scorer, used to name its output table.
    fn source(&self) -> ScoreSource;

    /// Scores each candidate, dropping pairs below the scorer's minimum.
    fn score_pairs(
        &self,
        kalshi: &[EventRecord],
        poly: &[EventRecord],
        candidates: &[CandidatePair],
    ) -> Vec<ScoredPair>;
}

fn scored_pair(kalshi: &EventRecord, poly: &EventRecord, score: f64) -> ScoredPair {
    ScoredPair {
        kalshi_event: kalshi.event_ticker.clone(),
        poly_event: poly.event_ticker.clone(),
        kalshi_title: kalshi.event_title.clone(),
        poly_title: poly.event_title.clone(),
        score,
    }
}

// =============================================================================
// Lexical
// =============================================================================

/// Token-sort similarity over titles or full text.
#[derive(Debug, Clone)]
pub struct LexicalScorer<S: TextSimilarity = TokenSortRatio> {
    field: TextField,
    similarity: S,
    min_score: f64,
}

impl LexicalScorer {
    /// Scorer over event titles.
    #[must_use]
    pub fn title(min_score: f64) -> Self {
        Self::with_similarity(TextField::Title, TokenSortRatio, min_score)
    }

    /// Scorer over full event text.
    #[must_use]
    pub fn full_text(min_score: f64) -> Self {
        Self::with_similarity(TextField::FullText, TokenSortRatio, min_score)
    }

    /// The title and full-text scorers configured from `config`.
    #[must_use]
    pub fn standard_pair(config: &ScoringConfig) -> [Self; 2] {
        [
            Self::title(config.lexical_min_score),
            Self::full_text(config.lexical_min_score),
        ]
    }
}

impl<S: TextSimilarity> LexicalScorer<S> {
    /// Scorer with a custom similarity function.
    pub fn with_similarity(field: TextField, similarity: S, min_score: f64) -> Self {
        Self {
            field,
            similarity,
            min_score,
        }
    }
}

impl<S: TextSimilarity> PairScorer for LexicalScorer<S> {
    fn source(&self) -> ScoreSource {
        match self.field {
            TextField::Title => ScoreSource::FuzzyTitle,
            TextField::FullText => ScoreSource::FuzzyFull,
        }
    }

    fn score_pairs(
        &self,
        kalshi: &[EventRecord],
        poly: &[EventRecord],
        candidates: &[CandidatePair],
    ) -> Vec<ScoredPair> {
        let pairs: Vec<ScoredPair> = candidates
            .par_iter()
            .filter_map(|c| {
                let (k, p) = (kalshi.get(c.kalshi)?, poly.get(c.poly)?);
                let score = self
                    .similarity
                    .similarity(self.field.of(k), self.field.of(p));
                (score >= self.min_score).then(|| scored_pair(k, p, score))
            })
            .collect();

        info!(
            source = %self.source(),
            candidates = candidates.len(),
            kept = pairs.len(),
            "Scored candidate pairs"
        );
        pairs
    }
}

// =============================================================================
// Semantic
// =============================================================================

/// Maps text to a dense vector. Implementations wrap an embedding model.
pub trait Embedder: Send + Sync {
    /// Embeds one text.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Cosine similarity of two vectors; 0 when either has zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Embedding similarity over titles or full text.
///
/// Each event that appears in a candidate is embedded once; input text is
/// cut to `max_chars` characters first.
#[derive(Debug, Clone)]
pub struct SemanticScorer<E: Embedder> {
    embedder: E,
    field: TextField,
    min_score: f64,
    max_chars: usize,
}

impl<E: Embedder> SemanticScorer<E> {
    /// Creates a scorer over `field` using `embedder`.
    pub fn new(embedder: E, field: TextField, config: &ScoringConfig) -> Self {
        Self {
            embedder,
            field,
            min_score: config.semantic_min_score,
            max_chars: config.semantic_max_chars,
        }
    }

    fn embed_all(&self, events: &[EventRecord], indices: BTreeSet<usize>) -> HashMap<usize, Vec<f32>> {
        indices
            .into_par_iter()
            .filter_map(|idx| {
                let text: String = self.field.of(events.get(idx)?).chars().take(self.max_chars).collect();
                Some((idx, self.embedder.embed(&text)))
            })
            .collect()
    }
}

impl<E: Embedder> PairScorer for SemanticScorer<E> {
    fn source(&self) -> ScoreSource {
        match self.field {
            TextField::Title => ScoreSource::SemanticTitle,
            TextField::FullText => ScoreSource::SemanticFull,
        }
    }

    fn score_pairs(
        &self,
        kalshi: &[EventRecord],
        poly: &[EventRecord],
        candidates: &[CandidatePair],
    ) -> Vec<ScoredPair> {
        let kalshi_vectors = self.embed_all(kalshi, candidates.iter().map(|c| c.kalshi).collect());
        let poly_vectors = self.embed_all(poly, candidates.iter().map(|c| c.poly).collect());

        let pairs: Vec<ScoredPair> = candidates
            .par_iter()
            .filter_map(|c| {
                let score = f64::from(cosine_similarity(
                    kalshi_vectors.get(&c.kalshi)?,
                    poly_vectors.get(&c.poly)?,
                ));
                (score >= self.min_score).then(|| scored_pair(&kalshi[c.kalshi], &poly[c.poly], score))
            })
            .collect();

        info!(
            source = %self.source(),
            candidates = candidates.len(),
            embedded = kalshi_vectors.len() + poly_vectors.len(),
            kept = pairs.len(),
            "Scored candidate pairs"
        );
        pairs
    }
}
