// * Listing Aggregator: search results page -> sampled listings + page statistics

use scraper::{Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::constants::{LISTING_SELECTOR, SAMPLE_CAP};
use crate::model::{ListingItem, PageAggregate};
use crate::ops::telemetry;
use crate::refinery::listing::ListingExtractor;
use crate::refinery::patterns::parse_result_count;

// * Result fragments in page order
static SELECTOR_RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(LISTING_SELECTOR).expect("Invalid result selector"));

// * The two known homes of the "1-16 of over 4,000 results" banner
static SELECTOR_BANNERS: LazyLock<[Selector; 2]> = LazyLock::new(|| {
    [
        Selector::parse(r#"[data-component-type="s-result-info-bar"]"#)
            .expect("Invalid info bar selector"),
        Selector::parse(".s-breadcrumb").expect("Invalid breadcrumb selector"),
    ]
});

/// Listings recovered from one page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageListings {
    pub items: Vec<ListingItem>,
    pub total_result_count: u64,
    pub sampled_count: usize,
}

impl PageListings {
    /// Computes the page averages over the recovered items
    pub fn aggregate(&self) -> PageAggregate {
        PageAggregate::from_items(&self.items, self.total_result_count)
    }
}

/// Runs the listing extractor over every result fragment of a page
#[derive(Debug, Clone)]
pub struct ListingAggregator {
    extractor: ListingExtractor,
    sample_cap: usize,
}

impl ListingAggregator {
    /// Creates an aggregator with the default sample cap
    pub fn new(extractor: ListingExtractor) -> Self {
        Self {
            extractor,
            sample_cap: SAMPLE_CAP,
        }
    }

    /// Overrides the number of fragments sampled per page
    pub fn with_sample_cap(mut self, sample_cap: usize) -> Self {
        self.sample_cap = sample_cap;
        self
    }

    /// Parses the page and extracts up to `sample_cap` listings in page order.
    /// Fragments that fail extraction are logged and skipped.
    pub fn aggregate(&self, page_html: &str) -> PageListings {
        let document = Html::parse_document(page_html);
        let total_result_count = read_result_count(&document);

        let mut items = Vec::new();
        for (index, fragment) in document.select(&SELECTOR_RESULT).take(self.sample_cap).enumerate() {
            match self.extractor.extract(fragment) {
                Ok(item) => items.push(item),
                Err(failure) => {
                    warn!(index, reason = failure.reason(), error = %failure, "Listing dropped");
                    telemetry::record_listing_dropped(failure.reason());
                }
            }
        }

        telemetry::record_listings_extracted(items.len());
        debug!(
            total_result_count,
            extracted = items.len(),
            sample_cap = self.sample_cap,
            "Page aggregated"
        );

        PageListings {
            sampled_count: items.len(),
            items,
            total_result_count,
        }
    }
}

impl Default for ListingAggregator {
    fn default() -> Self {
        Self::new(ListingExtractor::new())
    }
}

// * First banner location that yields a number wins; 0 when neither does
fn read_result_count(document: &Html) -> u64 {
    SELECTOR_BANNERS
        .iter()
        .flat_map(|selector| document.select(selector))
        .find_map(|banner| parse_result_count(&banner.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(asin: &str, title: &str, extra: &str) -> String {
        format!(
            r#"<div data-component-type="s-search-result" data-asin="{asin}">
                <h2><a href="/dp/{asin}"><span>{title}</span></a></h2>{extra}</div>"#
        )
    }

    fn page(banner: &str, listings: &[String]) -> String {
        format!(
            r#"<html><body>
                <div data-component-type="s-result-info-bar"><span>{banner}</span></div>
                <div class="s-main-slot">{}</div>
            </body></html>"#,
            listings.join("\n")
        )
    }

    #[test]
    fn test_reads_banner_and_preserves_order() {
        let html = page(
            "1-16 of over 4,000 results for \"cooking\"",
            &[
                listing("B01", "Zucchini Recipes", "<span>(10 ratings)</span>"),
                listing("B02", "Apple Desserts", "<span>(20 ratings)</span>"),
            ],
        );

        let page = ListingAggregator::default().aggregate(&html);

        assert_eq!(page.total_result_count, 4_000);
        assert_eq!(page.sampled_count, 2);
        assert_eq!(page.items[0].title, "Zucchini Recipes");
        assert_eq!(page.items[1].title, "Apple Desserts");
    }

    #[test]
    fn test_breadcrumb_banner_fallback() {
        let html = format!(
            r#"<html><body><div class="s-breadcrumb">1-48 of 812 results</div>{}</body></html>"#,
            listing("B01", "Camp Cooking", "")
        );
        assert_eq!(ListingAggregator::default().aggregate(&html).total_result_count, 812);
    }

    #[test]
    fn test_missing_banner_defaults_to_zero() {
        let html = page("Showing results", &[listing("B01", "Camp Cooking", "")]);
        assert_eq!(ListingAggregator::default().aggregate(&html).total_result_count, 0);
    }

    #[test]
    fn test_short_title_drops_listing_without_placeholder() {
        let html = page(
            "1-3 of 3 results",
            &[
                listing("B01", "Grilling Guide", ""),
                listing("B02", "Pho", ""),
                listing("B03", "Smoking Meat", ""),
            ],
        );

        let page = ListingAggregator::default().aggregate(&html);

        assert_eq!(page.sampled_count, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|i| i.title != "Pho"));
        assert_eq!(page.items[1].identifier.as_deref(), Some("B03"));
    }

    #[test]
    fn test_sample_cap_limits_fragments() {
        let listings: Vec<String> = (0..30)
            .map(|i| listing(&format!("B{i:02}"), &format!("Cookbook number {i}"), ""))
            .collect();
        let html = page("1-30 of 30 results", &listings);

        assert_eq!(ListingAggregator::default().aggregate(&html).sampled_count, 20);

        let capped = ListingAggregator::default().with_sample_cap(5).aggregate(&html);
        assert_eq!(capped.sampled_count, 5);
        assert_eq!(capped.items[4].title, "Cookbook number 4");
    }

    #[test]
    fn test_empty_page() {
        let page = ListingAggregator::default().aggregate("<html><body></body></html>");
        assert_eq!(page, PageListings::default());
        assert_eq!(page.aggregate(), PageAggregate::default());
    }
}
