// * Ordered text-pattern strategies for listing fields.
// * Each field owns a fixed table; the first strategy producing an in-range value wins.

use regex::Regex;
use std::sync::LazyLock;

// * Precompiled regex patterns, in precedence order per field

static RANK_BEST_SELLERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Best\s+Sellers?\s+Rank.*?#\s?([\d,]+)").expect("Invalid best sellers rank regex")
});

static RANK_IN_BOOKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#\s?([\d,]+)\s+in\s+Books").expect("Invalid rank-in-books regex")
});

static RANK_AMAZON_BEST_SELLERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Amazon\s+Best\s+Sellers?\s+Rank.*?#\s?([\d,]+)")
        .expect("Invalid amazon best sellers rank regex")
});

static RANK_BARE_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\d,]+)").expect("Invalid bare rank regex"));

static REVIEWS_PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*([\d,]+)\s+(?:ratings?|reviews?)\s*\)").expect("Invalid parenthesized reviews regex")
});

static REVIEWS_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d,]+)\s+global\s+(?:ratings?|reviews?)").expect("Invalid global reviews regex")
});

static REVIEWS_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\d,]+)\s+(?:ratings?|reviews?)\b").expect("Invalid bare reviews regex")
});

static PRICE_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.]+").expect("Invalid price regex"));

static RATING_OUT_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s+out\s+of\s+(\d+)").expect("Invalid rating regex")
});

static RESULT_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)of\s+(?:over\s+)?([\d,]+)\s+results").expect("Invalid result count regex")
});

/// A named text strategy: returns Some(value) when it recognises the text
#[derive(Clone, Copy)]
pub struct TextStrategy<T: 'static> {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<T>,
}

impl<T: 'static> std::fmt::Debug for TextStrategy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStrategy").field("name", &self.name).finish()
    }
}

/// Rank strategies, highest precedence first
pub static RANK_STRATEGIES: [TextStrategy<u32>; 4] = [
    TextStrategy { name: "best_sellers_rank", apply: |t| rank_from(&RANK_BEST_SELLERS, t) },
    TextStrategy { name: "rank_in_books", apply: |t| rank_from(&RANK_IN_BOOKS, t) },
    TextStrategy { name: "amazon_best_sellers_rank", apply: |t| rank_from(&RANK_AMAZON_BEST_SELLERS, t) },
    TextStrategy { name: "bare_hash", apply: |t| rank_from(&RANK_BARE_HASH, t) },
];

/// Review count strategies, highest precedence first
pub static REVIEW_STRATEGIES: [TextStrategy<u32>; 3] = [
    TextStrategy { name: "parenthesized", apply: |t| count_from(&REVIEWS_PARENTHESIZED, t) },
    TextStrategy { name: "global_ratings", apply: |t| count_from(&REVIEWS_GLOBAL, t) },
    TextStrategy { name: "bare_ratings", apply: |t| count_from(&REVIEWS_BARE, t) },
];

/// Runs `strategies` in order and returns the first hit with its strategy name
pub fn first_match<T: 'static>(strategies: &[TextStrategy<T>], text: &str) -> Option<(T, &'static str)> {
    strategies
        .iter()
        .find_map(|s| (s.apply)(text).map(|value| (value, s.name)))
}

/// Extracts the best sellers rank from a fragment's full text
pub fn parse_rank(text: &str) -> Option<u32> {
    first_match(&RANK_STRATEGIES, text).map(|(rank, _)| rank)
}

/// Extracts the review count from a fragment's full text
pub fn parse_review_count(text: &str) -> Option<u32> {
    first_match(&REVIEW_STRATEGIES, text).map(|(count, _)| count)
}

/// Parses a whole-price node such as "1,299." into 1299.0
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = strip_separators(text);
    let numeral = PRICE_NUMERAL.find(&cleaned)?;
    numeral
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Parses an accessible label like "4.6 out of 5 stars"
pub fn parse_rating(label: &str) -> Option<f64> {
    let caps = RATING_OUT_OF.captures(label)?;
    caps.get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|r| (0.0..=5.0).contains(r))
}

/// Parses the results banner, e.g. "1-16 of over 4,000 results for ..."
pub fn parse_result_count(banner: &str) -> Option<u64> {
    let caps = RESULT_COUNT.captures(banner)?;
    strip_separators(caps.get(1)?.as_str()).parse::<u64>().ok()
}

/// Removes thousands separators
pub fn strip_separators(digits: &str) -> String {
    digits.chars().filter(|c| *c != ',').collect()
}

// * Ranks must be >= 1; "#0" falls through to the next strategy
fn rank_from(pattern: &Regex, text: &str) -> Option<u32> {
    capture_number(pattern, text).filter(|r| *r >= 1)
}

fn count_from(pattern: &Regex, text: &str) -> Option<u32> {
    capture_number(pattern, text)
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u32> {
    let caps = pattern.captures(text)?;
    strip_separators(caps.get(1)?.as_str()).parse::<u32>().ok()
}
