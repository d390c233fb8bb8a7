//! Kalshi settled-market row schema.

use market_link_core::{Outcome, RawContract};
use serde::{Deserialize, Serialize};

/// One row of the Kalshi settled-markets table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalshiContractRow {
    pub ticker: String,
    pub event_ticker: String,
    pub title: String,
    pub result: String,
    #[serde(default)]
    pub rules_primary: Option<String>,
    #[serde(default)]
    pub rules_secondary: Option<String>,
}

impl KalshiContractRow {
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
                super::flatten_text(self.rules_primary),
                super::flatten_text(self.rules_secondary),
            ],
        })
    }
}
