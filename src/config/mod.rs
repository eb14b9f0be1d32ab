// * Analyzer configuration
// * Replaces process-wide constants with an explicit structure passed into the Analyzer.

pub mod constants;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use constants::*;

/// Thresholds used by the scoring engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub popularity_green_max: u64,
    pub popularity_yellow_max: u64,
    pub profitable_rank_max: u32,
    pub profitable_reviews_max: u32,
    pub profitability_green_min: usize,
    pub profitability_yellow_min: usize,
    pub entrenched_reviews_min: u32,
    pub competition_yellow_min: usize,
    pub competition_red_min: usize,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            popularity_green_max: POPULARITY_GREEN_MAX,
            popularity_yellow_max: POPULARITY_YELLOW_MAX,
            profitable_rank_max: PROFITABLE_RANK_MAX,
            profitable_reviews_max: PROFITABLE_REVIEWS_MAX,
            profitability_green_min: PROFITABILITY_GREEN_MIN,
            profitability_yellow_min: PROFITABILITY_YELLOW_MIN,
            entrenched_reviews_min: ENTRENCHED_REVIEWS_MIN,
            competition_yellow_min: COMPETITION_YELLOW_MIN,
            competition_red_min: COMPETITION_RED_MIN,
        }
    }
}

/// Timeouts for the page fetch step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSettings {
    pub navigation_timeout_ms: u64,
    pub content_timeout_ms: u64,
    pub content_poll_interval_ms: u64,
}

impl FetchSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_millis(self.content_timeout_ms)
    }

    pub fn content_poll_interval(&self) -> Duration {
        Duration::from_millis(self.content_poll_interval_ms)
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: NAVIGATION_TIMEOUT_MS,
            content_timeout_ms: CONTENT_TIMEOUT_MS,
            content_poll_interval_ms: CONTENT_POLL_INTERVAL_MS,
        }
    }
}

/// Full configuration surface of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Marketplace search endpoint (query string is appended per keyword)
    pub marketplace_url: String,
    /// Maximum number of listing fragments sampled from a page
    pub sample_cap: usize,
    /// Listings whose trimmed title is shorter than this are dropped
    pub min_title_chars: usize,
    pub fetch: FetchSettings,
    pub thresholds: ScoringThresholds,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
            sample_cap: SAMPLE_CAP,
            min_title_chars: MIN_TITLE_CHARS,
            fetch: FetchSettings::default(),
            thresholds: ScoringThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.sample_cap, 20);
        assert_eq!(config.min_title_chars, 5);
        assert_eq!(config.fetch.navigation_timeout(), Duration::from_secs(30));
        assert_eq!(config.fetch.content_timeout(), Duration::from_secs(10));
        assert_eq!(config.thresholds.profitable_rank_max, 30_000);
        assert_eq!(config.marketplace_url, "https://www.amazon.com/s");
    }

    #[test]
    fn test_partial_override() {
        let config = AnalyzerConfig {
            sample_cap: 5,
            ..Default::default()
        };
        assert_eq!(config.sample_cap, 5);
        assert_eq!(config.thresholds, ScoringThresholds::default());
    }
}
