// * Configuration Constants
// * Central location for all default thresholds, limits and timeouts.
// * Every value here is only a default; AnalyzerConfig overrides all of them.

// * Marketplace search endpoint and the books category filter
pub const DEFAULT_MARKETPLACE_URL: &str = "https://www.amazon.com/s";
pub const BOOKS_CATEGORY: &str = "stripbooks";

// * CSS selector of one search-result fragment on the results page
pub const LISTING_SELECTOR: &str = r#"[data-component-type="s-search-result"]"#;

// * Maximum number of result fragments sampled per page
pub const SAMPLE_CAP: usize = 20;

// * Page navigation timeout in milliseconds
pub const NAVIGATION_TIMEOUT_MS: u64 = 30_000;

// * Timeout waiting for listing markup to appear, in milliseconds
pub const CONTENT_TIMEOUT_MS: u64 = 10_000;

// * Poll interval while waiting for listing markup
pub const CONTENT_POLL_INTERVAL_MS: u64 = 250;

// * Titles shorter than this (after trimming) drop the whole listing
pub const MIN_TITLE_CHARS: usize = 5;

// * Plausibility bounds for page averages (exclusive)
pub const RANK_PLAUSIBLE_MAX: u32 = 999_999;
pub const REVIEWS_PLAUSIBLE_MAX: u32 = 1_000_000;
pub const RATING_MAX: f64 = 5.0;

// * Popularity tiers keyed on the marketplace result count
pub const POPULARITY_GREEN_MAX: u64 = 1_000;
pub const POPULARITY_YELLOW_MAX: u64 = 3_000;

// * A listing is "profitable" when it ranks well but is under-reviewed
pub const PROFITABLE_RANK_MAX: u32 = 30_000;
pub const PROFITABLE_REVIEWS_MAX: u32 = 200;
pub const PROFITABILITY_GREEN_MIN: usize = 6;
pub const PROFITABILITY_YELLOW_MIN: usize = 3;

// * A listing is an "entrenched incumbent" at or above this review count
pub const ENTRENCHED_REVIEWS_MIN: u32 = 500;
pub const COMPETITION_YELLOW_MIN: usize = 4;
pub const COMPETITION_RED_MIN: usize = 7;

// * Wire sentinels for unknown values
pub const RANK_UNKNOWN: u32 = 999_999;
pub const IDENTIFIER_UNKNOWN: &str = "N/A";
