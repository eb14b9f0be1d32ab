// * Telemetry - Structured Logging and Prometheus Metrics
// * Analyses are short-lived, so metrics are rendered on demand rather than served.

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, register_int_counter, register_int_counter_vec,
    CounterVec, Encoder, Histogram, IntCounter, IntCounterVec, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// * Default filter when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "bookscout=info";

lazy_static! {
    // * Analyses by outcome (success, validation_error, fetch_error)
    pub static ref ANALYSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bookscout_analyses_total",
        "Total number of keyword analyses by outcome",
        &["outcome"]
    ).expect("! CRITICAL: Failed to register bookscout_analyses_total");

    // * Wall time of the page fetch step, success or failure
    pub static ref FETCH_DURATION_SECONDS: Histogram = register_histogram!(
        "bookscout_fetch_duration_seconds",
        "Page fetch duration in seconds",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 45.0]
    ).expect("! CRITICAL: Failed to register bookscout_fetch_duration_seconds");

    // * Listings that passed title validation
    pub static ref LISTINGS_EXTRACTED_TOTAL: IntCounter = register_int_counter!(
        "bookscout_listings_extracted_total",
        "Total listings extracted from result pages"
    ).expect("! CRITICAL: Failed to register bookscout_listings_extracted_total");

    // * Listings skipped, by extraction failure reason
    pub static ref LISTINGS_DROPPED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bookscout_listings_dropped_total",
        "Total listings dropped during extraction by reason",
        &["reason"]
    ).expect("! CRITICAL: Failed to register bookscout_listings_dropped_total");

    // * Overall score distribution per tier band
    pub static ref OVERALL_SCORE_TOTAL: CounterVec = register_counter_vec!(
        "bookscout_overall_score_total",
        "Sum of overall scores by popularity tier",
        &["popularity_tier"]
    ).expect("! CRITICAL: Failed to register bookscout_overall_score_total");
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use bookscout::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(keyword = "cooking", "Analyzing keyword");
/// ```
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bookscout=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .init();
}

/// Records the outcome of one analysis
pub fn record_analysis(outcome: &str) {
    ANALYSES_TOTAL.with_label_values(&[outcome]).inc();
}

/// Records how long the fetch step took
pub fn record_fetch_duration(seconds: f64) {
    FETCH_DURATION_SECONDS.observe(seconds);
}

/// Records listings that survived extraction
pub fn record_listings_extracted(count: usize) {
    LISTINGS_EXTRACTED_TOTAL.inc_by(count as u64);
}

/// Records one dropped listing
pub fn record_listing_dropped(reason: &str) {
    LISTINGS_DROPPED_TOTAL.with_label_values(&[reason]).inc();
}

/// Records the overall score of a completed analysis
pub fn record_overall_score(popularity_tier: &str, overall_score: u8) {
    OVERALL_SCORE_TOTAL
        .with_label_values(&[popularity_tier])
        .inc_by(f64::from(overall_score));
}

/// Returns the current metrics in the Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_analysis_increments_outcome() {
        let before = ANALYSES_TOTAL.with_label_values(&["success"]).get();
        record_analysis("success");
        assert!(ANALYSES_TOTAL.with_label_values(&["success"]).get() > before);
    }

    #[test]
    fn test_record_listings() {
        let before = LISTINGS_EXTRACTED_TOTAL.get();
        record_listings_extracted(3);
        assert!(LISTINGS_EXTRACTED_TOTAL.get() >= before + 3);

        record_listing_dropped("title_too_short");
        assert!(LISTINGS_DROPPED_TOTAL.with_label_values(&["title_too_short"]).get() >= 1);
    }

    #[test]
    fn test_get_metrics_string() {
        record_fetch_duration(1.5);
        record_overall_score("red", 33);
        let metrics = get_metrics_string();
        assert!(metrics.contains("bookscout_fetch_duration_seconds"));
        assert!(metrics.contains("bookscout_overall_score_total"));
    }
}
