//! Entity resolution between Kalshi and Polymarket events and contracts.
//!
//! Both platforms list the same real-world questions under different tickers
//! and wording. This crate links them in stages:
//!
//! ```text
//! contracts --aggregate--> events --block--> candidates --score--> scorer outputs
//!     --consolidate--> best pair scores --mutual best--> event pairs
//!     --blank fill / title match--> contract pairs
//! ```
//!
//! # Modules
//!
//! - [`template`]: Collapse title families into `[blank]` templates
//! - [`normalize`]: Abbreviation and date normalization
//! - [`extract`]: Person-name and year blocking keys
//! - [`aggregate`]: Contracts to event records
//! - [`blocking`]: Candidate event pairs from a person/year index
//! - [`similarity`] and [`scoring`]: Lexical and semantic event scorers
//! - [`consolidate`]: Best normalized score per event pair
//! - [`mutual_best`]: One-to-one filtering of scored pairs
//! - [`blank_fill`]: Recover a contract's fill of its event template
//! - [`matcher`]: Contract pairing within an event pair
//! - [`pipeline`]: All of the above with one configuration
//!
//! # Example
//!
//! ```ignore
//! use market_link_matching::{EventAggregator, LexicalScorer, LinkPipeline};
//!
//! let aggregator = EventAggregator::standard(&config.aggregation)?;
//! let kalshi = aggregator.aggregate(Platform::Kalshi, &kalshi_contracts);
//! let poly = aggregator.aggregate(Platform::Polymarket, &poly_contracts);
//!
//! let pipeline = LinkPipeline::from_config(&config);
//! let [title, full] = LexicalScorer::standard_pair(&config.scoring);
//! let outputs = pipeline.score(&kalshi, &poly, &[&title, &full]);
//!
//! let report = pipeline.link(pipeline.consolidate(outputs)?, &kalshi, &poly);
//! report.summary.log();
//! ```

pub mod aggregate;
pub mod blank_fill;
pub mod blocking;
pub mod consolidate;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod mutual_best;
pub mod normalize;
pub mod pipeline;
pub mod scoring;
pub mod similarity;
pub mod template;

pub use aggregate::EventAggregator;
pub use blank_fill::extract_blank;
pub use blocking::{BlockingIndex, CandidatePair};
pub use consolidate::ScoreConsolidator;
pub use error::{LinkError, Result};
pub use extract::{PersonExtractor, YearExtractor};
pub use matcher::{MarketMatchMode, MarketMatchOutcome, MarketMatcher, MatchConfig};
pub use mutual_best::{mutual_best, RankedPair};
pub use normalize::{PassThrough, TextNormalize, TextNormalizer};
pub use pipeline::{LinkPipeline, LinkReport, LinkSummary};
pub use scoring::{cosine_similarity, Embedder, LexicalScorer, PairScorer, SemanticScorer, TextField};
pub use similarity::{TextSimilarity, TokenSortRatio};
pub use template::{content_len, generalize, generalize_with_fallback};
