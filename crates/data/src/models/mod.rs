//! Per-platform row schemas for the raw contract tables.
//!
//! Each platform gets an explicit, typed row; conversion into
//! [`market_link_core::RawContract`] drops non-binary markets.

pub mod kalshi;
pub mod polymarket;

pub use kalshi::KalshiContractRow;
pub use polymarket::PolymarketContractRow;

/// Collapses embedded line breaks into spaces and trims the result.
pub(crate) fn flatten_text(text: Option<String>) -> String {
    text.unwrap_or_default()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
