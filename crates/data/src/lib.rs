//! Tabular storage for the market link pipeline.
//!
//! This crate provides:
//! - Typed row schemas for each platform's raw contract table
//! - CSV readers and writers for processed, scored and linked tables
//! - Conventional file names for each table

pub mod csv_storage;
pub mod models;

// Re-export commonly used types
pub use csv_storage::{
    event_table_path, matched_events_path, matched_markets_path, raw_table_path,
    scorer_table_path, CsvStorage,
};
pub use models::{KalshiContractRow, PolymarketContractRow};
