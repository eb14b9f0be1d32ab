// * Analysis Orchestrator
// * keyword -> fetch session -> page HTML -> listings -> scores -> AnalysisResult

pub mod errors;

pub use errors::{AnalysisError, ErrorRecord};

use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::config::AnalyzerConfig;
use crate::engine::fetcher::{FetchSession, PageFetcher};
use crate::engine::scoring::{ScoreCard, ScoringEngine};
use crate::model::ListingItem;
use crate::network::search_url::{build_search_url, marketplace_origin};
use crate::ops::telemetry;
use crate::refinery::{ListingAggregator, ListingExtractor};

/// Final response record of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub keyword: String,
    pub items: Vec<ListingItem>,
    pub total_result_count: u64,
    pub sampled_count: usize,
    pub average_rank: u32,
    pub average_rating: f64,
    pub average_review_count: u32,
    pub scores: ScoreCard,
}

impl AnalysisResult {
    /// Converts result to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Converts result to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Runs keyword analyses against a page fetcher
pub struct Analyzer<F> {
    fetcher: F,
    config: AnalyzerConfig,
    aggregator: ListingAggregator,
    scoring: ScoringEngine,
}

impl<F: PageFetcher> Analyzer<F> {
    /// Creates an analyzer with default configuration
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, AnalyzerConfig::default())
    }

    /// Creates an analyzer with custom configuration
    pub fn with_config(fetcher: F, config: AnalyzerConfig) -> Self {
        let extractor = match marketplace_origin(&config.marketplace_url) {
            Some(origin) => ListingExtractor::with_link_base(origin),
            None => ListingExtractor::new(),
        }
        .with_min_title_chars(config.min_title_chars);

        Self {
            aggregator: ListingAggregator::new(extractor).with_sample_cap(config.sample_cap),
            scoring: ScoringEngine::new(config.thresholds.clone()),
            fetcher,
            config,
        }
    }

    /// Returns the current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one keyword. The fetch session is released before the fetch
    /// outcome is inspected, so it is released on success and failure alike.
    #[instrument(skip_all, fields(keyword = %keyword))]
    pub async fn analyze(&self, keyword: &str) -> Result<AnalysisResult, AnalysisError> {
        let outcome = self.run(keyword).await;

        match &outcome {
            Ok(result) => {
                telemetry::record_analysis("success");
                telemetry::record_overall_score(
                    result.scores.popularity.tier.as_str(),
                    result.scores.overall_score,
                );
            }
            Err(AnalysisError::Validation(_)) => telemetry::record_analysis("validation_error"),
            Err(AnalysisError::Fetch(e)) => {
                error!(error = %e, timeout = e.is_timeout(), "Analysis aborted by fetch failure");
                telemetry::record_analysis("fetch_error");
            }
        }

        outcome
    }

    async fn run(&self, keyword: &str) -> Result<AnalysisResult, AnalysisError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AnalysisError::Validation("keyword is required".to_string()));
        }

        let url = build_search_url(&self.config.marketplace_url, keyword)?;
        let html = self.fetch(&url).await?;

        let page = self.aggregator.aggregate(&html);
        let aggregate = page.aggregate();
        let scores = self.scoring.score(page.total_result_count, &page.items);

        info!(
            total_result_count = page.total_result_count,
            sampled_count = page.sampled_count,
            overall_score = scores.overall_score,
            popularity = scores.popularity.tier.as_str(),
            profitability = scores.profitability.tier.as_str(),
            competition = scores.competition.tier.as_str(),
            "Analysis complete"
        );

        Ok(AnalysisResult {
            keyword: keyword.to_string(),
            total_result_count: aggregate.total_result_count,
            sampled_count: aggregate.sampled_count,
            average_rank: aggregate.average_rank,
            average_rating: aggregate.average_rating,
            average_review_count: aggregate.average_review_count,
            items: page.items,
            scores,
        })
    }

    // * Acquire, use, release. Release is awaited before `?` can return early.
    async fn fetch(&self, url: &str) -> Result<String, AnalysisError> {
        let started = Instant::now();
        let mut session = self.fetcher.open_session().await?;

        let fetched = session.fetch_html(url).await;
        session.release().await;

        telemetry::record_fetch_duration(started.elapsed().as_secs_f64());
        Ok(fetched?)
    }
}
