// * Pattern Extractor: one search-result fragment -> ListingItem
// * Every field resolves independently; only the title can reject the listing.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::constants::MIN_TITLE_CHARS;
use crate::model::ListingItem;
use crate::network::search_url::normalize_url;
use crate::refinery::patterns::{parse_price, parse_rank, parse_rating, parse_review_count};

// * Precompiled CSS selectors for listing fields
static SELECTOR_HEADING_LINK_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2 a span").expect("Invalid heading link span selector"));
static SELECTOR_HEADING_NORMAL_TEXT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2 .a-text-normal").expect("Invalid heading text selector"));
static SELECTOR_HEADING_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2 a").expect("Invalid heading link selector"));
static SELECTOR_PRICE_WHOLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-price-whole").expect("Invalid price selector"));
static SELECTOR_ARIA_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[aria-label]").expect("Invalid aria-label selector"));

// * Attribute carrying the marketplace item id
const IDENTIFIER_ATTR: &str = "data-asin";

/// Reasons a whole listing is dropped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionFailure {
    #[error("no title node found")]
    MissingTitle,

    #[error("title {title:?} shorter than {min} characters")]
    TitleTooShort { title: String, min: usize },
}

impl ExtractionFailure {
    /// Label used for the dropped-listings metric
    pub fn reason(&self) -> &'static str {
        match self {
            ExtractionFailure::MissingTitle => "missing_title",
            ExtractionFailure::TitleTooShort { .. } => "title_too_short",
        }
    }
}

/// A named markup strategy: returns Some(text) when its node is present and non-empty
struct NodeStrategy {
    name: &'static str,
    selector: &'static LazyLock<Selector>,
}

// * Title strategies, highest precedence first
static TITLE_STRATEGIES: [NodeStrategy; 3] = [
    NodeStrategy { name: "heading_link_span", selector: &SELECTOR_HEADING_LINK_SPAN },
    NodeStrategy { name: "heading_normal_text", selector: &SELECTOR_HEADING_NORMAL_TEXT },
    NodeStrategy { name: "heading_link", selector: &SELECTOR_HEADING_LINK },
];

/// Extracts listing attributes from search-result fragments
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    /// Base used to absolutize product links
    link_base: Option<String>,
    min_title_chars: usize,
}

impl ListingExtractor {
    /// Creates an extractor that leaves product links unresolved
    pub fn new() -> Self {
        Self {
            link_base: None,
            min_title_chars: MIN_TITLE_CHARS,
        }
    }

    /// Creates an extractor resolving product links against `link_base`
    pub fn with_link_base(link_base: impl Into<String>) -> Self {
        Self {
            link_base: Some(link_base.into()),
            min_title_chars: MIN_TITLE_CHARS,
        }
    }

    /// Overrides the minimum title length (in characters, after trimming)
    pub fn with_min_title_chars(mut self, min_title_chars: usize) -> Self {
        self.min_title_chars = min_title_chars;
        self
    }

    /// Extracts one listing. Fails only when the title is missing or too short.
    pub fn extract(&self, fragment: ElementRef<'_>) -> Result<ListingItem, ExtractionFailure> {
        let title = self.extract_title(fragment)?;
        let full_text = collapse_whitespace(&fragment.text().collect::<Vec<_>>().join(" "));

        Ok(ListingItem {
            title,
            identifier: extract_identifier(fragment),
            price: extract_price(fragment),
            rank: parse_rank(&full_text),
            rating: extract_rating(fragment),
            review_count: parse_review_count(&full_text),
            url: self.extract_url(fragment),
        })
    }

    fn extract_title(&self, fragment: ElementRef<'_>) -> Result<String, ExtractionFailure> {
        let (title, strategy) = TITLE_STRATEGIES
            .iter()
            .find_map(|s| {
                fragment
                    .select(s.selector)
                    .map(|node| collapse_whitespace(&node.text().collect::<String>()))
                    .find(|text| !text.is_empty())
                    .map(|text| (text, s.name))
            })
            .ok_or(ExtractionFailure::MissingTitle)?;

        if title.chars().count() < self.min_title_chars {
            return Err(ExtractionFailure::TitleTooShort {
                title,
                min: self.min_title_chars,
            });
        }

        tracing::trace!(strategy, title = %title, "Title resolved");
        Ok(title)
    }

    fn extract_url(&self, fragment: ElementRef<'_>) -> Option<String> {
        let base = self.link_base.as_deref()?;
        let href = fragment
            .select(&SELECTOR_HEADING_LINK)
            .find_map(|a| a.value().attr("href"))?;
        normalize_url(href, base)
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_identifier(fragment: ElementRef<'_>) -> Option<String> {
    fragment
        .value()
        .attr(IDENTIFIER_ATTR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn extract_price(fragment: ElementRef<'_>) -> Option<f64> {
    let node = fragment.select(&SELECTOR_PRICE_WHOLE).next()?;
    parse_price(&node.text().collect::<String>())
}

fn extract_rating(fragment: ElementRef<'_>) -> Option<f64> {
    fragment
        .select(&SELECTOR_ARIA_LABEL)
        .filter_map(|node| node.value().attr("aria-label"))
        .find_map(parse_rating)
}

// * Trims and folds runs of whitespace (titles span several text nodes)
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    static SELECTOR_RESULT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-component-type=\"s-search-result\"]").unwrap());

    fn extract_first(html: &str, extractor: &ListingExtractor) -> Result<ListingItem, ExtractionFailure> {
        let document = Html::parse_fragment(html);
        let fragment = document.select(&SELECTOR_RESULT).next().expect("fixture has a result");
        extractor.extract(fragment)
    }

    const FULL_LISTING: &str = r#"
        <div data-component-type="s-search-result" data-asin="B0COOK0001">
            <h2><a class="a-link-normal" href="/Salt-Fat-Acid-Heat/dp/B0COOK0001/ref=sr_1_1?qid=1&sr=8-1">
                <span class="a-size-medium a-text-normal">  Salt, Fat, Acid,
                    Heat  </span></a></h2>
            <span aria-label="4.8 out of 5 stars"><i class="a-icon-star"></i></span>
            <span>(12,345 ratings)</span>
            <span class="a-price"><span class="a-price-whole">18.</span><span class="a-price-fraction">99</span></span>
            <div>Best Sellers Rank: #1,204 in Books</div>
        </div>
    "#;

    #[test]
    fn test_extracts_every_field() {
        let extractor = ListingExtractor::with_link_base("https://www.amazon.com/");
        let item = extract_first(FULL_LISTING, &extractor).unwrap();

        assert_eq!(item.title, "Salt, Fat, Acid, Heat");
        assert_eq!(item.identifier.as_deref(), Some("B0COOK0001"));
        assert_eq!(item.price, Some(18.0));
        assert_eq!(item.rank, Some(1_204));
        assert_eq!(item.rating, Some(4.8));
        assert_eq!(item.review_count, Some(12_345));
        assert_eq!(
            item.url.as_deref(),
            Some("https://www.amazon.com/Salt-Fat-Acid-Heat/dp/B0COOK0001")
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = ListingExtractor::new();
        let first = extract_first(FULL_LISTING, &extractor).unwrap();
        let second = extract_first(FULL_LISTING, &extractor).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_fields_are_unknown() {
        let html = r#"<div data-component-type="s-search-result" data-asin="">
            <h2><a href="/x"><span>Bread Baking Basics</span></a></h2></div>"#;
        let item = extract_first(html, &ListingExtractor::new()).unwrap();

        assert_eq!(item.title, "Bread Baking Basics");
        assert_eq!(item.identifier, None);
        assert_eq!(item.price, None);
        assert_eq!(item.rank, None);
        assert_eq!(item.rating, None);
        assert_eq!(item.review_count, None);
        assert_eq!(item.url, None);
    }

    #[test]
    fn test_title_falls_back_to_normal_text_node() {
        let html = r#"<div data-component-type="s-search-result">
            <h2><span class="a-text-normal">Knife Skills Handbook</span></h2></div>"#;
        let item = extract_first(html, &ListingExtractor::new()).unwrap();
        assert_eq!(item.title, "Knife Skills Handbook");
    }

    #[test]
    fn test_title_falls_back_to_bare_link() {
        let html = r#"<div data-component-type="s-search-result">
            <h2><a href="/y">Sourdough Every Day</a></h2></div>"#;
        let item = extract_first(html, &ListingExtractor::new()).unwrap();
        assert_eq!(item.title, "Sourdough Every Day");
    }

    #[test]
    fn test_empty_span_falls_through_to_next_strategy() {
        let html = r#"<div data-component-type="s-search-result">
            <h2><a href="/z"><span>   </span>Pasta Night</a></h2></div>"#;
        let item = extract_first(html, &ListingExtractor::new()).unwrap();
        assert_eq!(item.title, "Pasta Night");
    }

    #[test]
    fn test_short_title_rejected() {
        let html = r#"<div data-component-type="s-search-result">
            <h2><a><span> Pie </span></a></h2></div>"#;
        let err = extract_first(html, &ListingExtractor::new()).unwrap_err();
        assert_eq!(
            err,
            ExtractionFailure::TitleTooShort { title: "Pie".to_string(), min: 5 }
        );
        assert_eq!(err.reason(), "title_too_short");
    }

    #[test]
    fn test_min_title_chars_override() {
        let html = r#"<div data-component-type="s-search-result">
            <h2><a><span> Pie </span></a></h2></div>"#;
        let extractor = ListingExtractor::new().with_min_title_chars(3);
        assert_eq!(extract_first(html, &extractor).unwrap().title, "Pie");

        let strict = ListingExtractor::new().with_min_title_chars(30);
        let err = extract_first(FULL_LISTING, &strict).unwrap_err();
        assert!(matches!(err, ExtractionFailure::TitleTooShort { min: 30, .. }));
    }

    #[test]
    fn test_title_internal_whitespace_is_folded() {
        let html = "<div data-component-type=\"s-search-result\">
            <h2><a><span>  Salt   and \t\n  Pepper  </span></a></h2></div>";
        let item = extract_first(html, &ListingExtractor::new()).unwrap();
        assert_eq!(item.title, "Salt and Pepper");
    }

    #[test]
    fn test_missing_title_rejected() {
        let html = r#"<div data-component-type="s-search-result"><span>(10 ratings)</span></div>"#;
        let err = extract_first(html, &ListingExtractor::new()).unwrap_err();
        assert_eq!(err, ExtractionFailure::MissingTitle);
    }

    #[test]
    fn test_rating_skips_unrelated_labels() {
        let html = r#"<div data-component-type="s-search-result">
            <h2><a><span>Vegan for Everyone</span></a></h2>
            <button aria-label="Add to list"></button>
            <span aria-label="4.2 out of 5 stars"></span></div>"#;
        let item = extract_first(html, &ListingExtractor::new()).unwrap();
        assert_eq!(item.rating, Some(4.2));
    }
}
