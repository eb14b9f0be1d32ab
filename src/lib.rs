//! Market viability scoring for book topics.
//!
//! A keyword is searched on the marketplace, listing attributes are recovered
//! from the rendered results page, and three tiered scores (popularity,
//! profitability, competition) plus an overall score are derived from them.
//!
//! ```ignore
//! use bookscout::{Analyzer, BrowserFetcher, FetchSettings};
//!
//! let analyzer = Analyzer::new(BrowserFetcher::new(FetchSettings::default()));
//! let result = analyzer.analyze("sourdough").await?;
//! println!("{}", result.to_json_pretty());
//! ```

pub mod analysis;
pub mod config;
pub mod engine;
pub mod model;
pub mod network;
pub mod ops;
pub mod refinery;

pub use analysis::{AnalysisError, AnalysisResult, Analyzer, ErrorRecord};
pub use config::{AnalyzerConfig, FetchSettings, ScoringThresholds};
pub use engine::{
    BrowserFetcher, FetchSession, PageFetcher, ScoreCard, ScoringEngine, SnapshotFetcher, Tier,
    TierScore,
};
pub use model::{ListingItem, PageAggregate};
pub use network::errors::FetchError;
pub use refinery::{ExtractionFailure, ListingAggregator, ListingExtractor, PageListings};
