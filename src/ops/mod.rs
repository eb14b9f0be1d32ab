// * Operations: structured logging and metrics for analysis runs

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, record_analysis,
    record_fetch_duration, record_listing_dropped, record_listings_extracted,
    record_overall_score,
};
