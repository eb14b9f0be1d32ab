// * Listing data model
// * Unknown fields are `None` inside the crate; the marketplace-compatible
// * sentinels (999999, 0, "N/A") only exist in the serialized form.

use serde::{Serialize, Serializer};

use crate::config::constants::{
    IDENTIFIER_UNKNOWN, RANK_PLAUSIBLE_MAX, RANK_UNKNOWN, RATING_MAX, REVIEWS_PLAUSIBLE_MAX,
};

/// One marketplace search result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingItem {
    pub title: String,
    #[serde(serialize_with = "sentinel::identifier")]
    pub identifier: Option<String>,
    #[serde(serialize_with = "sentinel::zero_f64")]
    pub price: Option<f64>,
    #[serde(serialize_with = "sentinel::rank")]
    pub rank: Option<u32>,
    #[serde(serialize_with = "sentinel::zero_f64")]
    pub rating: Option<f64>,
    #[serde(serialize_with = "sentinel::zero_u32")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ListingItem {
    /// Creates an item with only a title; every other field unknown
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identifier: None,
            price: None,
            rank: None,
            rating: None,
            review_count: None,
            url: None,
        }
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_reviews(mut self, review_count: u32) -> Self {
        self.review_count = Some(review_count);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Rank usable for averaging, i.e. inside (0, 999999)
    pub fn plausible_rank(&self) -> Option<u32> {
        self.rank.filter(|r| *r > 0 && *r < RANK_PLAUSIBLE_MAX)
    }

    /// Review count usable for averaging, i.e. inside (0, 1000000)
    pub fn plausible_reviews(&self) -> Option<u32> {
        self.review_count
            .filter(|n| *n > 0 && *n < REVIEWS_PLAUSIBLE_MAX)
    }

    /// Rating usable for averaging, i.e. inside (0, 5]
    pub fn plausible_rating(&self) -> Option<f64> {
        self.rating.filter(|r| *r > 0.0 && *r <= RATING_MAX)
    }
}

/// Page level statistics derived from the sampled listings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAggregate {
    pub total_result_count: u64,
    pub sampled_count: usize,
    pub average_rank: u32,
    pub average_rating: f64,
    pub average_review_count: u32,
}

impl PageAggregate {
    /// Computes plausibility-filtered averages over `items`.
    /// An empty plausible set yields 0 rather than an error.
    pub fn from_items(items: &[ListingItem], total_result_count: u64) -> Self {
        let average_rank = mean(items.iter().filter_map(|i| i.plausible_rank()).map(f64::from))
            .map(|m| m.round() as u32)
            .unwrap_or(0);

        let average_review_count =
            mean(items.iter().filter_map(|i| i.plausible_reviews()).map(f64::from))
                .map(|m| m.round() as u32)
                .unwrap_or(0);

        let average_rating = mean(items.iter().filter_map(|i| i.plausible_rating()))
            .map(|m| (m * 10.0).round() / 10.0)
            .unwrap_or(0.0);

        Self {
            total_result_count,
            sampled_count: items.len(),
            average_rank,
            average_rating,
            average_review_count,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

// * serialize_with helpers mapping None to the marketplace sentinels
mod sentinel {
    use super::*;

    pub fn identifier<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(IDENTIFIER_UNKNOWN))
    }

    pub fn rank<S: Serializer>(value: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(value.unwrap_or(RANK_UNKNOWN))
    }

    pub fn zero_u32<S: Serializer>(value: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(value.unwrap_or(0))
    }

    pub fn zero_f64<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(value.unwrap_or(0.0))
    }
}
