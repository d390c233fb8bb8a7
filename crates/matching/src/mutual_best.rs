//! Mutual-best filtering of scored pairs.
//!
//! A pair (a, b) survives when b is a's best partner and a is b's best
//! partner. The result is a one-to-one matching: every left key and every
//! right key appears in at most one surviving pair.

use market_link_core::{ConsolidatedPair, MatchedMarketPair};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// A scored pair with ordered keys on each side.
pub trait RankedPair {
    /// Left-side key type.
    type Left: Ord + Clone;
    /// Right-side key type.
    type Right: Ord + Clone;

    /// Left-side key.
    fn left_key(&self) -> &Self::Left;
    /// Right-side key.
    fn right_key(&self) -> &Self::Right;
    /// Higher is better.
    fn rank_score(&self) -> f64;
}

impl RankedPair for ConsolidatedPair {
    type Left = String;
    type Right = String;

    fn left_key(&self) -> &String {
        &self.kalshi_event
    }

    fn right_key(&self) -> &String {
        &self.poly_event
    }

    fn rank_score(&self) -> f64 {
        self.score
    }
}

impl RankedPair for MatchedMarketPair {
    type Left = String;
    type Right = String;

    fn left_key(&self) -> &String {
        &self.kalshi_ticker
    }

    fn right_key(&self) -> &String {
        &self.poly_ticker
    }

    fn rank_score(&self) -> f64 {
        self.market_score
    }
}

/// Returns true if (`score`, `key`) beats the current best; ties go to the
/// lower key.
fn beats<K: Ord>(score: f64, key: &K, best: &(f64, K)) -> bool {
    match score.total_cmp(&best.0) {
        Ordering::Greater => true,
        Ordering::Equal => key < &best.1,
        Ordering::Less => false,
    }
}

fn record_best<K: Ord + Clone, P: Ord + Clone>(
    table: &mut BTreeMap<K, (f64, P)>,
    key: &K,
    partner: &P,
    score: f64,
) {
    match table.get_mut(key) {
        Some(best) if beats(score, partner, best) => *best = (score, partner.clone()),
        Some(_) => {}
        None => {
            table.insert(key.clone(), (score, partner.clone()));
        }
    }
}

/// Keeps only pairs that are the best choice for both of their keys.
///
/// Duplicate (left, right) entries collapse to the first occurrence.
/// Surviving pairs keep their input order.
#[must_use]
pub fn mutual_best<T: RankedPair>(pairs: Vec<T>) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let unique: Vec<T> = pairs
        .into_iter()
        .filter(|p| seen.insert((p.left_key().clone(), p.right_key().clone())))
        .collect();

    let mut best_for_left: BTreeMap<T::Left, (f64, T::Right)> = BTreeMap::new();
    let mut best_for_right: BTreeMap<T::Right, (f64, T::Left)> = BTreeMap::new();
    for pair in &unique {
        let score = pair.rank_score();
        record_best(&mut best_for_left, pair.left_key(), pair.right_key(), score);
        record_best(&mut best_for_right, pair.right_key(), pair.left_key(), score);
    }

    unique
        .into_iter()
        .filter(|pair| {
            let left_wins = best_for_left
                .get(pair.left_key())
                .is_some_and(|(_, right)| right == pair.right_key());
            let right_wins = best_for_right
                .get(pair.right_key())
                .is_some_and(|(_, left)| left == pair.left_key());
            left_wins && right_wins
        })
        .collect()
}
