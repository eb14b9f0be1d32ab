// * The Listing Refinery (Extraction Pipeline)
// * Goal: Recover structured listing attributes from noisy search-result markup.
// * Fields degrade to "unknown" independently; only a bad title drops a listing.

pub mod aggregator;
pub mod listing;
pub mod patterns;

// * Re-exports for convenient access
pub use aggregator::{ListingAggregator, PageListings};
pub use listing::{ExtractionFailure, ListingExtractor};
pub use patterns::{
    parse_price, parse_rank, parse_rating, parse_result_count, parse_review_count, TextStrategy,
    RANK_STRATEGIES, REVIEW_STRATEGIES,
};
