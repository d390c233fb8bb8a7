//! Score consolidation across scorers.

use crate::error::{LinkError, Result};
use market_link_core::{ConsolidatedPair, ScorerOutput};
use std::collections::HashMap;
use tracing::{debug, info};

/// Merges scorer outputs into one best normalized score per event pair.
#[derive(Debug, Clone, Copy)]
pub struct ScoreConsolidator {
    floor: f64,
}

impl ScoreConsolidator {
    /// Creates a consolidator dropping pairs below `floor` (in `[0, 1]`).
    #[must_use]
    pub fn new(floor: f64) -> Self {
        Self { floor }
    }

    /// Normalizes every score to `[0, 1]`, keeps the maximum per
    /// (kalshi, poly) pair and drops pairs below the floor.
    ///
    /// Output is sorted by score descending, then by event keys.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::NoScorerOutput`] if `outputs` is empty.
    pub fn consolidate(&self, outputs: Vec<ScorerOutput>) -> Result<Vec<ConsolidatedPair>> {
        if outputs.is_empty() {
            return Err(LinkError::no_scorer_output("consolidation input"));
        }

        let source_count = outputs.len();
        let mut input_pairs = 0usize;
        let mut best: HashMap<(String, String), ConsolidatedPair> = HashMap::new();

        for output in outputs {
            let scale = output.source.scale();
            debug!(source = %output.source, pairs = output.pairs.len(), "Consolidating scorer output");
            input_pairs += output.pairs.len();

            for pair in output.pairs {
                let candidate = ConsolidatedPair {
                    score: pair.score / scale,
                    source: output.source,
                    kalshi_event: pair.kalshi_event,
                    poly_event: pair.poly_event,
                    kalshi_title: pair.kalshi_title,
                    poly_title: pair.poly_title,
                };
                let key = (candidate.kalshi_event.clone(), candidate.poly_event.clone());
                match best.get(&key) {
                    Some(existing) if existing.score >= candidate.score => {}
                    _ => {
                        best.insert(key, candidate);
                    }
                }
            }
        }

        let unique = best.len();
        let mut pairs: Vec<ConsolidatedPair> = best
            .into_values()
            .filter(|pair| pair.score >= self.floor)
            .collect();
        pairs.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.kalshi_event.cmp(&b.kalshi_event))
                .then_with(|| a.poly_event.cmp(&b.poly_event))
        });

        info!(
            sources = source_count,
            input_pairs,
            unique,
            kept = pairs.len(),
            floor = self.floor,
            "Consolidated event scores"
        );
        Ok(pairs)
    }
}
