//! Core types and configuration for linking prediction markets across
//! Kalshi and Polymarket.
//!
//! This crate provides:
//! - Record types for every table the link pipeline reads or writes
//! - Layered configuration (defaults, TOML, environment, JSON)

pub mod config;
pub mod config_loader;
pub mod types;

pub use config::{
    AggregationConfig, AppConfig, BlockingConfig, LinkingConfig, PathsConfig, ScoringConfig,
    SuffixMismatchPolicy,
};
pub use config_loader::ConfigLoader;
pub use types::{
    ConsolidatedPair, EventContract, EventRecord, MatchedEventPair, MatchedMarketPair, Outcome,
    Platform, ProcessedContract, RawContract, ScoreSource, ScoredPair, ScorerOutput,
    BLANK_MARKER,
};
