//! Detection of items that are sitting unused in the closet.

use chrono::{DateTime, Utc};
use shared::{ClothingItem, ItemAnalytics};

use crate::domain::analytics::{calculate_days_since_last_wear, logs_for, WearLogsByItem};

/// Days without wear after which an item counts as stagnant
pub const DEFAULT_STAGNANT_THRESHOLD_DAYS: i64 = 90;

/// Classifies items as stagnant: never worn, or not worn for at least
/// `threshold_days`.
#[derive(Debug, Clone, Copy)]
pub struct StagnationDetector {
    threshold_days: i64,
}

impl Default for StagnationDetector {
    fn default() -> Self {
        Self::new(DEFAULT_STAGNANT_THRESHOLD_DAYS)
    }
}

impl StagnationDetector {
    pub fn new(threshold_days: i64) -> Self {
        Self { threshold_days }
    }

    pub fn threshold_days(&self) -> i64 {
        self.threshold_days
    }

    /// Whether a precomputed analytics record is stagnant
    pub fn is_stagnant(&self, analytics: &ItemAnalytics) -> bool {
        self.is_stagnant_days(analytics.days_since_last_wear)
    }

    fn is_stagnant_days(&self, days_since_last_wear: i64) -> bool {
        days_since_last_wear == ItemAnalytics::NEVER_WORN
            || days_since_last_wear >= self.threshold_days
    }

    /// Stagnant subset of `items`, in input order
    pub fn identify_stagnant_items(
        &self,
        items: &[ClothingItem],
        wear_logs_by_item: &WearLogsByItem,
        now: DateTime<Utc>,
    ) -> Vec<ClothingItem> {
        items
            .iter()
            .filter(|item| {
                let logs = logs_for(wear_logs_by_item, &item.id);
                self.is_stagnant_days(calculate_days_since_last_wear(logs, now))
            })
            .cloned()
            .collect()
    }
}

/// Stagnant items using the default 90-day threshold
pub fn identify_stagnant_items(
    items: &[ClothingItem],
    wear_logs_by_item: &WearLogsByItem,
    now: DateTime<Utc>,
) -> Vec<ClothingItem> {
    StagnationDetector::default().identify_stagnant_items(items, wear_logs_by_item, now)
}
