//! Rule-based outfit composition.
//!
//! ## Algorithm
//!
//! 1. Partition items into category buckets
//! 2. Bail out with no outfits unless there is at least one top and one bottom
//! 3. Rank each bucket by `0.6 * weather + 0.4 * (1 - wear_frequency)`
//! 4. Pair the best tops with the best bottoms (at most 5 of each) in nested
//!    loop order, stopping once 5 outfits exist
//! 5. Add the best outerwear in cold weather and the best shoes when available
//! 6. Score each outfit on weather fit, wear frequency and time since last wear
//! 7. Return the outfits best score first
//!
//! Only the first five pairs in loop order are ever scored, so the result is
//! the best of those five rather than the best five overall.

use chrono::{DateTime, Utc};
use log::debug;
use shared::{Category, ClothingItem, ItemAnalytics, OutfitSuggestion, WeatherReading};

use crate::domain::analytics::{analytics_for, WearLogsByItem};
use crate::domain::weather_scoring::{score_item_for_weather, WeatherConditions};

/// Maximum outfits returned
pub const MAX_OUTFITS: usize = 5;
/// Maximum candidates taken from each of tops and bottoms
pub const MAX_PER_CATEGORY: usize = 5;

const RANK_WEATHER_WEIGHT: f64 = 0.6;
const RANK_WEAR_WEIGHT: f64 = 0.4;

const OUTFIT_WEATHER_WEIGHT: f64 = 0.4;
const OUTFIT_WEAR_WEIGHT: f64 = 0.3;
const OUTFIT_RECENCY_WEIGHT: f64 = 0.3;
/// Days since last wear are capped here; never-worn items count as the cap
const RECENCY_CAP_DAYS: i64 = 30;

/// An item with the scores used for ranking it within its category
#[derive(Debug, Clone)]
struct RankedItem<'a> {
    item: &'a ClothingItem,
    weather_score: f64,
    analytics: ItemAnalytics,
}

impl RankedItem<'_> {
    fn rank_score(&self) -> f64 {
        RANK_WEATHER_WEIGHT * self.weather_score
            + RANK_WEAR_WEIGHT * (1.0 - self.analytics.wear_frequency)
    }

    fn capped_days_since_wear(&self) -> f64 {
        match self.analytics.last_worn_days() {
            None => RECENCY_CAP_DAYS as f64,
            Some(days) => days.min(RECENCY_CAP_DAYS) as f64,
        }
    }
}

#[derive(Debug, Default)]
struct CategoryBuckets<'a> {
    tops: Vec<RankedItem<'a>>,
    bottoms: Vec<RankedItem<'a>>,
    outerwear: Vec<RankedItem<'a>>,
    shoes: Vec<RankedItem<'a>>,
    accessories: Vec<RankedItem<'a>>,
}

impl<'a> CategoryBuckets<'a> {
    fn partition(
        items: &'a [ClothingItem],
        conditions: &WeatherConditions,
        wear_logs_by_item: &WearLogsByItem,
        now: DateTime<Utc>,
    ) -> Self {
        let mut buckets = Self::default();
        for item in items {
            let ranked = RankedItem {
                item,
                weather_score: score_item_for_weather(item, conditions),
                analytics: analytics_for(item, wear_logs_by_item, now),
            };
            match item.category {
                Category::Tops => buckets.tops.push(ranked),
                Category::Bottoms => buckets.bottoms.push(ranked),
                Category::Outerwear => buckets.outerwear.push(ranked),
                Category::Shoes => buckets.shoes.push(ranked),
                Category::Accessories => buckets.accessories.push(ranked),
            }
        }
        buckets
    }

    fn rank(&mut self) {
        for bucket in [
            &mut self.tops,
            &mut self.bottoms,
            &mut self.outerwear,
            &mut self.shoes,
        ] {
            // Stable: equal scores keep catalog order
            bucket.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));
        }
    }
}

/// Compose up to five ranked outfits for the given weather.
///
/// Never fails: without at least one top and one bottom the result is empty.
pub fn suggest_outfits(
    items: &[ClothingItem],
    weather: &WeatherReading,
    wear_logs_by_item: &WearLogsByItem,
    now: DateTime<Utc>,
) -> Vec<OutfitSuggestion> {
    let conditions = WeatherConditions::from_reading(weather);
    let mut buckets = CategoryBuckets::partition(items, &conditions, wear_logs_by_item, now);

    if buckets.tops.is_empty() || buckets.bottoms.is_empty() {
        debug!(
            "Cannot compose outfits: {} tops, {} bottoms",
            buckets.tops.len(),
            buckets.bottoms.len()
        );
        return Vec::new();
    }

    buckets.rank();
    debug!(
        "Composing outfits from {} tops, {} bottoms, {} outerwear, {} shoes ({} accessories unused)",
        buckets.tops.len(),
        buckets.bottoms.len(),
        buckets.outerwear.len(),
        buckets.shoes.len(),
        buckets.accessories.len()
    );

    let layer = if conditions.is_cold {
        buckets.outerwear.first()
    } else {
        None
    };
    let footwear = buckets.shoes.first();
    let reason = conditions.outfit_reason();

    let mut suggestions = Vec::with_capacity(MAX_OUTFITS);
    'tops: for top in buckets.tops.iter().take(MAX_PER_CATEGORY) {
        for bottom in buckets.bottoms.iter().take(MAX_PER_CATEGORY) {
            if suggestions.len() >= MAX_OUTFITS {
                break 'tops;
            }

            let mut members = vec![top, bottom];
            members.extend(layer);
            members.extend(footwear);

            suggestions.push(score_outfit(&members, reason));
        }
    }

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(MAX_OUTFITS);
    suggestions
}

fn mean(members: &[&RankedItem<'_>], value: impl Fn(&RankedItem<'_>) -> f64) -> f64 {
    members.iter().map(|&m| value(m)).sum::<f64>() / members.len() as f64
}

fn score_outfit(members: &[&RankedItem<'_>], reason: &str) -> OutfitSuggestion {
    let avg_weather = mean(members, |m| m.weather_score);
    let avg_wear_frequency = mean(members, |m| m.analytics.wear_frequency);
    let avg_days_since_wear = mean(members, |m| m.capped_days_since_wear());
    let avg_cost_per_wear = mean(members, |m| m.analytics.cost_per_wear);

    let score = avg_weather * OUTFIT_WEATHER_WEIGHT
        + (1.0 - avg_wear_frequency) * OUTFIT_WEAR_WEIGHT
        + (avg_days_since_wear / RECENCY_CAP_DAYS as f64) * OUTFIT_RECENCY_WEIGHT;

    OutfitSuggestion {
        items: members.iter().map(|m| m.item.clone()).collect(),
        score,
        reason: reason.to_string(),
        avg_cost_per_wear,
    }
}
