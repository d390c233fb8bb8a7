//! Event aggregation.
//!
//! Folds per-contract rows into one [`EventRecord`] per event ticker: the
//! generalized title and rules, normalized text for scoring, and the person
//! and year blocking keys.

use crate::error::Result;
use crate::extract::{PersonExtractor, YearExtractor};
use crate::normalize::{TextNormalize, TextNormalizer};
use crate::template::{generalize, generalize_with_fallback};
use market_link_core::{
    AggregationConfig, EventContract, EventRecord, Platform, ProcessedContract, RawContract,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds event records from contract tables.
#[derive(Clone)]
pub struct EventAggregator {
    normalizer: Arc<dyn TextNormalize>,
    persons: PersonExtractor,
    years: YearExtractor,
    kalshi_title_min_content: Option<usize>,
    polymarket_title_min_content: Option<usize>,
}

impl EventAggregator {
    /// Creates an aggregator with a custom normalizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the year pattern fails to compile.
    pub fn new(config: &AggregationConfig, normalizer: Arc<dyn TextNormalize>) -> Result<Self> {
        Ok(Self {
            normalizer,
            persons: PersonExtractor::from_config(config),
            years: YearExtractor::from_config(config)?,
            kalshi_title_min_content: config.kalshi_title_min_content,
            polymarket_title_min_content: config.polymarket_title_min_content,
        })
    }

    /// Creates an aggregator using the standard regex normalizer.
    ///
    /// # Errors
    ///
    /// Returns an error if a normalization pattern fails to compile.
    pub fn standard(config: &AggregationConfig) -> Result<Self> {
        Self::new(config, Arc::new(TextNormalizer::standard()?))
    }

    /// Returns the normalizer applied to event and contract text.
    #[must_use]
    pub fn normalizer(&self) -> &dyn TextNormalize {
        self.normalizer.as_ref()
    }

    fn title_min_content(&self, platform: Platform) -> Option<usize> {
        match platform {
            Platform::Kalshi => self.kalshi_title_min_content,
            Platform::Polymarket => self.polymarket_title_min_content,
        }
    }

    /// Groups raw contracts by event ticker and aggregates each group.
    ///
    /// Events are returned ordered by ticker; contracts keep input order.
    #[must_use]
    pub fn aggregate(&self, platform: Platform, contracts: &[RawContract]) -> Vec<EventRecord> {
        let groups = contracts
            .iter()
            .fold(BTreeMap::<&str, Vec<&RawContract>>::new(), |mut acc, contract| {
                acc.entry(contract.event_ticker.as_str())
                    .or_default()
                    .push(contract);
                acc
            });

        let events: Vec<EventRecord> = groups
            .into_iter()
            .map(|(event_ticker, group)| self.aggregate_group(platform, event_ticker, &group))
            .collect();

        info!(
            %platform,
            contracts = contracts.len(),
            events = events.len(),
            "Aggregated events"
        );
        events
    }

    fn aggregate_group(
        &self,
        platform: Platform,
        event_ticker: &str,
        group: &[&RawContract],
    ) -> EventRecord {
        let titles: Vec<&str> = group.iter().map(|c| c.title.as_str()).collect();
        let title_template = generalize_with_fallback(&titles, self.title_min_content(platform));

        let field_count = group.iter().map(|c| c.text_fields.len()).max().unwrap_or(0);
        let rules_template = (0..field_count)
            .map(|idx| {
                let field: Vec<&str> = group
                    .iter()
                    .map(|c| c.text_fields.get(idx).map_or("", String::as_str))
                    .collect();
                generalize(&field)
            })
            .filter(|rules| !rules.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let normalize = |text: &str| self.normalizer.normalize(text);
        let event_title = normalize(&title_template);
        let event_rules = normalize(&rules_template);
        let event_text = normalize(&format!("{title_template} {rules_template}"));

        let persons = self.persons.extract_all(&titles);
        let years = self.years.extract(&event_text);
        debug!(
            %platform,
            event_ticker,
            event_title = %event_title,
            persons = persons.len(),
            years = years.len(),
            "Aggregated event"
        );

        EventRecord {
            platform,
            event_ticker: event_ticker.to_string(),
            event_title,
            event_rules,
            event_text,
            persons,
            years,
            contracts: group
                .iter()
                .map(|c| EventContract {
                    ticker: c.ticker.clone(),
                    title: normalize(&c.title),
                    original_title: c.title.clone(),
                    result: c.result,
                })
                .collect(),
        }
    }

    /// Rebuilds event records from a persisted processed table.
    ///
    /// Event-level fields come from each event's first row; persons are
    /// re-extracted from the original titles and years from the event text.
    #[must_use]
    pub fn rebuild(&self, platform: Platform, rows: Vec<ProcessedContract>) -> Vec<EventRecord> {
        let row_count = rows.len();
        let groups = rows
            .into_iter()
            .fold(BTreeMap::<String, Vec<ProcessedContract>>::new(), |mut acc, row| {
                acc.entry(row.event_ticker.clone()).or_default().push(row);
                acc
            });

        let events: Vec<EventRecord> = groups
            .into_iter()
            .filter_map(|(event_ticker, group)| {
                let first = group.first()?;
                let original_titles: Vec<&str> =
                    group.iter().map(|r| r.original_title.as_str()).collect();

                Some(EventRecord {
                    platform,
                    persons: self.persons.extract_all(&original_titles),
                    years: self.years.extract(&first.event_text),
                    event_title: first.event_title.clone(),
                    event_rules: first.event_rules.clone(),
                    event_text: first.event_text.clone(),
                    contracts: group
                        .iter()
                        .map(|r| EventContract {
                            ticker: r.ticker.clone(),
                            title: r.title.clone(),
                            original_title: r.original_title.clone(),
                            result: r.result,
                        })
                        .collect(),
                    event_ticker,
                })
            })
            .collect();

        info!(
            %platform,
            rows = row_count,
            events = events.len(),
            "Rebuilt events from processed table"
        );
        events
    }
}

impl std::fmt::Debug for EventAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventAggregator")
            .field("persons", &self.persons)
            .field("years", &self.years)
            .field("kalshi_title_min_content", &self.kalshi_title_min_content)
            .field("polymarket_title_min_content", &self.polymarket_title_min_content)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::PassThrough;
    use market_link_core::Outcome;
    use std::collections::BTreeSet;

    fn contract(ticker: &str, event: &str, title: &str, fields: &[&str]) -> RawContract {
        RawContract {
            ticker: ticker.to_string(),
            event_ticker: event.to_string(),
            title: title.to_string(),
            result: Outcome::No,
            text_fields: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    fn verbatim() -> EventAggregator {
        EventAggregator::new(&AggregationConfig::default(), Arc::new(PassThrough)).unwrap()
    }

    #[test]
    fn test_one_record_per_event_ticker() {
        let contracts = vec![
            contract("A-1", "A", "Will Trump win Ohio in 2028?", &[]),
            contract("B-1", "B", "Will Newsom run?", &[]),
            contract("A-2", "A", "Will Trump win Texas in 2028?", &[]),
        ];
        let events = verbatim().aggregate(Platform::Kalshi, &contracts);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_ticker, "A");
        assert_eq!(events[0].contracts.len(), 2);
        assert_eq!(events[0].contracts[1].ticker, "A-2");
        assert_eq!(events[1].event_ticker, "B");
    }

    #[test]
    fn test_generalized_title_persons_and_years() {
        let contracts = vec![
            contract(
                "K-OH",
                "K",
                "Will Trump win Ohio in 2028?",
                &["If Trump wins Ohio in 2028, resolves Yes.", ""],
            ),
            contract(
                "K-TX",
                "K",
                "Will Trump win Texas in 2028?",
                &["If Trump wins Texas in 2028, resolves Yes.", ""],
            ),
        ];
        let events = verbatim().aggregate(Platform::Kalshi, &contracts);
        let event = &events[0];

        assert_eq!(event.event_title, "Will Trump win [blank] in 2028?");
        assert_eq!(event.event_rules, "If Trump wins [blank] in 2028, resolves Yes.");
        assert_eq!(
            event.event_text,
            "Will Trump win [blank] in 2028? If Trump wins [blank] in 2028, resolves Yes."
        );
        assert_eq!(event.persons, BTreeSet::from(["trump".to_string()]));
        assert_eq!(event.years, BTreeSet::from([2028]));
    }

    #[test]
    fn test_polymarket_title_fallback() {
        let contracts = vec![
            contract("p-1", "who-wins", "Trump", &["", "Who will win?"]),
            contract("p-2", "who-wins", "Harris", &["", "Who will win?"]),
        ];
        let aggregator = verbatim();

        let poly = aggregator.aggregate(Platform::Polymarket, &contracts);
        assert_eq!(poly[0].event_title, "Trump");
        assert_eq!(poly[0].event_rules, "Who will win?");

        let kalshi = aggregator.aggregate(Platform::Kalshi, &contracts);
        assert_eq!(kalshi[0].event_title, "[blank]");
    }

    #[test]
    fn test_standard_normalizer_applied() {
        let contracts = vec![
            contract("K-1", "K", "Will the GOP win Ohio?", &["Closes 2026-11-03."]),
            contract("K-2", "K", "Will the GOP win Iowa?", &["Closes 2026-11-03."]),
        ];
        let aggregator = EventAggregator::standard(&AggregationConfig::default()).unwrap();
        let event = &aggregator.aggregate(Platform::Kalshi, &contracts)[0];

        assert_eq!(event.event_title, "will the republican win [blank]");
        assert_eq!(event.event_rules, "closes november 3, 2026.");
        assert_eq!(event.contracts[0].title, "will the republican win ohio?");
        assert_eq!(event.contracts[0].original_title, "Will the GOP win Ohio?");
        assert_eq!(event.years, BTreeSet::from([2026]));
    }

    #[test]
    fn test_rebuild_matches_aggregate() {
        let contracts = vec![
            contract("K-OH", "K", "Will Vance win Ohio in 2028?", &["Rules 2028"]),
            contract("K-TX", "K", "Will Vance win Texas in 2028?", &["Rules 2028"]),
        ];
        let aggregator = verbatim();
        let events = aggregator.aggregate(Platform::Kalshi, &contracts);

        let rows: Vec<ProcessedContract> = events[0]
            .contracts
            .iter()
            .map(|c| ProcessedContract {
                ticker: c.ticker.clone(),
                event_ticker: events[0].event_ticker.clone(),
                title: c.title.clone(),
                original_title: c.original_title.clone(),
                result: c.result,
                event_title: events[0].event_title.clone(),
                event_rules: events[0].event_rules.clone(),
                event_text: events[0].event_text.clone(),
            })
            .collect();

        let rebuilt = aggregator.rebuild(Platform::Kalshi, rows);
        assert_eq!(rebuilt, events);
    }

    #[test]
    fn test_empty_input() {
        assert!(verbatim().aggregate(Platform::Kalshi, &[]).is_empty());
        assert!(verbatim().rebuild(Platform::Kalshi, Vec::new()).is_empty());
    }
}
