//! Polymarket closed-market row schema.
//!
//! Polymarket has no per-market ticker scheme of its own; the market slug
//! serves as `ticker` and the parent event slug as `event_ticker`.

use market_link_core::{Outcome, RawContract};
use serde::{Deserialize, Serialize};

/// One row of the Polymarket closed-markets table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolymarketContractRow {
    pub ticker: String,
    pub event_ticker: String,
    pub title: String,
    pub result: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Event-level description, repeated on every market of the event.
    #[serde(default)]
    pub event_description: Option<String>,
}

impl PolymarketContractRow {
    /// Converts the row into a contract, or `None` if the result is not yes/no.
    #[must_use]
    pub fn into_contract(self) -> Option<RawContract> {
        let result = Outcome::parse(&self.result)?;
        Some(RawContract {
            ticker: self.ticker,
            event_ticker: self.event_ticker,
            title: self.title,
            result,
            text_fields: vec![
                super::flatten_text(self.description),
                super::flatten_text(self.event_description),
            ],
        })
    }
}
