pub mod fetcher;
pub mod scoring;
pub mod slow_path;
pub mod snapshot;

pub use fetcher::{FetchSession, PageFetcher};
pub use scoring::{overall_score, ScoreCard, ScoringEngine, Tier, TierScore};
pub use slow_path::{BrowserFetcher, BrowserSession};
pub use snapshot::{SnapshotFetcher, SnapshotSession};
