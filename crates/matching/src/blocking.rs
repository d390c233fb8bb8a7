//! Candidate generation for event pairs.
//!
//! Scoring every Kalshi event against every Polymarket event is quadratic.
//! The blocking index only emits pairs that share at least one person token
//! (or where neither side names a person) and whose years, when both sides
//! mention any, are within a small window.

use market_link_core::EventRecord;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// A candidate pair of event indices into the left and right event lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidatePair {
    /// Index into the Kalshi events.
    pub kalshi: usize,
    /// Index into the Polymarket events.
    pub poly: usize,
}

/// Inverted person index over the right-hand (Polymarket) events.
#[derive(Debug, Clone)]
pub struct BlockingIndex<'a> {
    right: &'a [EventRecord],
    by_person: HashMap<&'a str, Vec<usize>>,
    personless: Vec<usize>,
    year_window: i32,
}

impl<'a> BlockingIndex<'a> {
    /// Indexes `right` by person token.
    #[must_use]
    pub fn build(right: &'a [EventRecord], year_window: i32) -> Self {
        let mut by_person: HashMap<&'a str, Vec<usize>> = HashMap::new();
        let mut personless = Vec::new();

        for (idx, event) in right.iter().enumerate() {
            if event.persons.is_empty() {
                personless.push(idx);
            }
            for person in &event.persons {
                by_person.entry(person.as_str()).or_default().push(idx);
            }
        }

        debug!(
            events = right.len(),
            persons = by_person.len(),
            personless = personless.len(),
            "Built blocking index"
        );

        Self {
            right,
            by_person,
            personless,
            year_window,
        }
    }

    /// Right-hand indices sharing a person with `event`, or every
    /// person-less right event when `event` names nobody.
    fn lookup(&self, event: &EventRecord) -> BTreeSet<usize> {
        if event.persons.is_empty() {
            return self.personless.iter().copied().collect();
        }
        event
            .persons
            .iter()
            .filter_map(|person| self.by_person.get(person.as_str()))
            .flatten()
            .copied()
            .collect()
    }

    /// Returns true unless both events mention years and none are within the window.
    #[must_use]
    pub fn years_compatible(&self, left: &EventRecord, right: &EventRecord) -> bool {
        if left.years.is_empty() || right.years.is_empty() {
            return true;
        }
        left.years.iter().any(|yl| {
            right
                .years
                .iter()
                .any(|yr| (yl - yr).abs() <= self.year_window)
        })
    }

    /// Emits sorted, de-duplicated candidate pairs for every left event.
    #[must_use]
    pub fn candidates(&self, left: &[EventRecord]) -> Vec<CandidatePair> {
        let pairs: Vec<CandidatePair> = left
            .iter()
            .enumerate()
            .flat_map(|(kalshi, event)| {
                self.lookup(event)
                    .into_iter()
                    .filter(move |&poly| self.years_compatible(event, &self.right[poly]))
                    .map(move |poly| CandidatePair { kalshi, poly })
            })
            .collect();

        let full = left.len() * self.right.len();
        let reduction = if full == 0 {
            0.0
        } else {
            1.0 - pairs.len() as f64 / full as f64
        };
        info!(
            kalshi_events = left.len(),
            poly_events = self.right.len(),
            candidates = pairs.len(),
            reduction_pct = (reduction * 1000.0).round() / 10.0,
            "Generated candidate pairs"
        );

        pairs
    }
}
