//! Error types for the matching engine.
//!
//! Extraction misses (no blank fill, no persons, no years) are not errors;
//! they surface as `None` or empty sets. Only conditions that stop a stage
//! from producing a complete table are represented here.

use thiserror::Error;

/// Errors that can occur while linking events.
#[derive(Debug, Error)]
pub enum LinkError {
    /// No scorer produced any output to consolidate.
    #[error("no scorer output available (searched: {searched})")]
    NoScorerOutput {
        /// Description of where outputs were expected.
        searched: String,
    },

    /// A normalization or extraction pattern failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Configuration value outside its usable range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LinkError {
    /// Creates a no-scorer-output error.
    pub fn no_scorer_output(searched: impl Into<String>) -> Self {
        Self::NoScorerOutput {
            searched: searched.into(),
        }
    }
}

/// Result type for matching operations.
pub type Result<T> = std::result::Result<T, LinkError>;
