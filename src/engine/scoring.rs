// * Scoring Engine
// * Pure functions from (result count, listings) to three tiered scores and an overall score.

use serde::Serialize;

use crate::config::ScoringThresholds;
use crate::model::ListingItem;

/// Three-way viability classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Green,
    Yellow,
    Red,
}

impl Tier {
    /// Numeric value carried by each tier
    pub fn value(&self) -> u8 {
        match self {
            Tier::Green => 100,
            Tier::Yellow => 50,
            Tier::Red => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Green => "green",
            Tier::Yellow => "yellow",
            Tier::Red => "red",
        }
    }
}

/// One tiered score, optionally with the listing count that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierScore {
    pub tier: Tier,
    pub value: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl TierScore {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            value: tier.value(),
            count: None,
        }
    }

    pub fn counted(tier: Tier, count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::new(tier)
        }
    }
}

/// All scores for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub popularity: TierScore,
    pub profitability: TierScore,
    pub competition: TierScore,
    pub overall_score: u8,
}

/// Scores listings against a set of thresholds
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    thresholds: ScoringThresholds,
}

impl ScoringEngine {
    pub fn new(thresholds: ScoringThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ScoringThresholds {
        &self.thresholds
    }

    /// Computes every score. Order of `items` does not matter.
    pub fn score(&self, total_result_count: u64, items: &[ListingItem]) -> ScoreCard {
        let popularity = self.popularity(total_result_count);
        let profitability = self.profitability(items);
        let competition = self.competition(items);

        ScoreCard {
            popularity,
            profitability,
            competition,
            overall_score: overall_score(&[popularity, profitability, competition]),
        }
    }

    /// Fewer marketplace results means a less crowded topic
    pub fn popularity(&self, total_result_count: u64) -> TierScore {
        let t = &self.thresholds;
        let tier = if total_result_count <= t.popularity_green_max {
            Tier::Green
        } else if total_result_count <= t.popularity_yellow_max {
            Tier::Yellow
        } else {
            Tier::Red
        };
        TierScore::new(tier)
    }

    /// Counts listings that rank well while being under-reviewed
    pub fn profitability(&self, items: &[ListingItem]) -> TierScore {
        let t = &self.thresholds;
        let count = items.iter().filter(|i| self.is_profitable(i)).count();

        let tier = if count >= t.profitability_green_min {
            Tier::Green
        } else if count >= t.profitability_yellow_min {
            Tier::Yellow
        } else {
            Tier::Red
        };
        TierScore::counted(tier, count)
    }

    /// Counts entrenched incumbents; more of them means harder competition
    pub fn competition(&self, items: &[ListingItem]) -> TierScore {
        let t = &self.thresholds;
        let count = items.iter().filter(|i| self.is_entrenched(i)).count();

        let tier = if count >= t.competition_red_min {
            Tier::Red
        } else if count >= t.competition_yellow_min {
            Tier::Yellow
        } else {
            Tier::Green
        };
        TierScore::counted(tier, count)
    }

    // * Unknown rank never qualifies; unknown reviews read as under-reviewed
    fn is_profitable(&self, item: &ListingItem) -> bool {
        let t = &self.thresholds;
        let ranks_well = item
            .rank
            .is_some_and(|r| r > 0 && r <= t.profitable_rank_max);
        let under_reviewed = item
            .review_count
            .map_or(true, |n| n <= t.profitable_reviews_max);
        ranks_well && under_reviewed
    }

    fn is_entrenched(&self, item: &ListingItem) -> bool {
        item.review_count
            .is_some_and(|n| n >= self.thresholds.entrenched_reviews_min)
    }
}

/// Mean of the score values, rounded half up
pub fn overall_score(scores: &[TierScore]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().map(|s| u32::from(s.value)).sum();
    let n = scores.len() as u32;
    // * Integer form of floor(sum / n + 0.5)
    ((2 * sum + n) / (2 * n)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScoringEngine {
        ScoringEngine::default()
    }

    fn items(rank_reviews: &[(Option<u32>, Option<u32>)]) -> Vec<ListingItem> {
        rank_reviews
            .iter()
            .enumerate()
            .map(|(i, (rank, reviews))| {
                let mut item = ListingItem::titled(format!("Listing number {i}"));
                item.rank = *rank;
                item.review_count = *reviews;
                item
            })
            .collect()
    }

    #[test]
    fn test_popularity_boundaries() {
        let e = engine();
        assert_eq!(e.popularity(0).tier, Tier::Green);
        assert_eq!(e.popularity(1_000).tier, Tier::Green);
        assert_eq!(e.popularity(1_001).tier, Tier::Yellow);
        assert_eq!(e.popularity(3_000).tier, Tier::Yellow);
        assert_eq!(e.popularity(3_001).tier, Tier::Red);
        assert_eq!(e.popularity(3_001).value, 0);
        assert_eq!(e.popularity(1_000).count, None);
    }

    #[test]
    fn test_profitability_counts_exactly() {
        let listings = items(&[
            (Some(1), Some(0)),
            (Some(30_000), Some(200)),
            (Some(30_001), Some(10)),
            (Some(100), Some(201)),
            (None, Some(5)),
            (Some(500), None),
        ]);

        let score = engine().profitability(&listings);

        // * Qualifying: rank 1/0, rank 30000/200, rank 500/unknown
        assert_eq!(score.count, Some(3));
        assert_eq!(score.tier, Tier::Yellow);
    }

    #[test]
    fn test_profitability_thresholds_inclusive() {
        let e = engine();
        let qualifying = |n: usize| items(&vec![(Some(10), Some(1)); n]);

        assert_eq!(e.profitability(&qualifying(2)).tier, Tier::Red);
        assert_eq!(e.profitability(&qualifying(3)).tier, Tier::Yellow);
        assert_eq!(e.profitability(&qualifying(5)).tier, Tier::Yellow);
        assert_eq!(e.profitability(&qualifying(6)).tier, Tier::Green);
    }

    #[test]
    fn test_competition_thresholds_inclusive() {
        let e = engine();
        let entrenched = |n: usize| items(&vec![(None, Some(500)); n]);

        assert_eq!(e.competition(&entrenched(3)).tier, Tier::Green);
        assert_eq!(e.competition(&entrenched(4)).tier, Tier::Yellow);
        assert_eq!(e.competition(&entrenched(6)).tier, Tier::Yellow);
        assert_eq!(e.competition(&entrenched(7)).tier, Tier::Red);
    }

    #[test]
    fn test_competition_ignores_unknown_reviews() {
        let listings = items(&[(None, None), (None, Some(499)), (None, Some(500))]);
        assert_eq!(engine().competition(&listings).count, Some(1));
    }

    #[test]
    fn test_empty_items_are_defined() {
        let card = engine().score(0, &[]);
        assert_eq!(card.profitability, TierScore::counted(Tier::Red, 0));
        assert_eq!(card.competition, TierScore::counted(Tier::Green, 0));
        assert_eq!(card.popularity, TierScore::new(Tier::Green));
        // * (100 + 0 + 100) / 3 = 66.67
        assert_eq!(card.overall_score, 67);
    }

    #[test]
    fn test_overall_score_all_combinations() {
        let tiers = [Tier::Green, Tier::Yellow, Tier::Red];
        for a in tiers {
            for b in tiers {
                for c in tiers {
                    let scores = [TierScore::new(a), TierScore::new(b), TierScore::new(c)];
                    let mean = f64::from(u32::from(a.value()) + u32::from(b.value()) + u32::from(c.value())) / 3.0;
                    assert_eq!(overall_score(&scores), mean.round() as u8, "{a:?} {b:?} {c:?}");
                }
            }
        }
    }

    #[test]
    fn test_score_is_order_insensitive() {
        let mut listings = items(&[
            (Some(10), Some(5)),
            (Some(50_000), Some(900)),
            (Some(20), Some(700)),
        ]);
        let forward = engine().score(2_000, &listings);
        listings.reverse();
        assert_eq!(engine().score(2_000, &listings), forward);
    }

    #[test]
    fn test_alternate_thresholds() {
        let engine = ScoringEngine::new(ScoringThresholds {
            popularity_green_max: 10,
            popularity_yellow_max: 20,
            profitability_yellow_min: 1,
            ..Default::default()
        });
        let listings = items(&[(Some(10), Some(5))]);

        assert_eq!(engine.thresholds().popularity_yellow_max, 20);
        assert_eq!(engine.thresholds().competition_red_min, 7);

        let card = engine.score(15, &listings);
        assert_eq!(card.popularity.tier, Tier::Yellow);
        assert_eq!(card.profitability.tier, Tier::Yellow);
    }

    #[test]
    fn test_tier_serialization() {
        let json = serde_json::to_value(TierScore::counted(Tier::Yellow, 4)).unwrap();
        assert_eq!(json["tier"], "yellow");
        assert_eq!(json["value"], 50);
        assert_eq!(json["count"], 4);
    }
}
