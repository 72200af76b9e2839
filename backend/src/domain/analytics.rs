//! Per-item wear analytics.
//!
//! All metrics are derived on demand from an item and its wear logs and are
//! never stored. "Now" is passed in so the results are a pure function of
//! their inputs.
//!
//! ## Metrics
//!
//! - **times_worn**: number of wear logs for the item
//! - **cost_per_wear**: purchase price / times worn (full price when never worn)
//! - **days_since_last_wear**: days since the latest wear, `-1` when never worn
//! - **days_owned**: days since purchase
//! - **wear_frequency**: times worn / days owned (0 when owned under a day)

use chrono::{DateTime, Utc};
use log::debug;
use shared::{ClothingItem, ItemAnalytics, WearLog};
use std::collections::HashMap;

use crate::domain::date_math::{days_since, parse_date};

/// Wear logs keyed by item id
pub type WearLogsByItem = HashMap<String, Vec<WearLog>>;

/// Cost per wear. When the item was never worn the price is returned unchanged.
pub fn calculate_cost_per_wear(purchase_price: f64, times_worn: usize) -> f64 {
    if times_worn == 0 {
        return purchase_price;
    }
    purchase_price / times_worn as f64
}

/// Days since the most recent wear, or `-1` if there are no wear logs.
///
/// Logs with unreadable dates sort below every valid date.
pub fn calculate_days_since_last_wear(wear_logs: &[WearLog], now: DateTime<Utc>) -> i64 {
    let latest = wear_logs
        .iter()
        .max_by_key(|log| parse_date(&log.wear_date));

    match latest {
        Some(log) => days_since(&log.wear_date, now),
        None => ItemAnalytics::NEVER_WORN,
    }
}

pub fn calculate_days_owned(purchase_date: &str, now: DateTime<Utc>) -> i64 {
    days_since(purchase_date, now)
}

/// Wears per day owned; 0 when `days_owned` is 0
pub fn calculate_wear_frequency(times_worn: usize, days_owned: i64) -> f64 {
    if days_owned == 0 {
        return 0.0;
    }
    times_worn as f64 / days_owned as f64
}

/// Derive the full analytics record for one item
pub fn calculate_item_analytics(
    item: &ClothingItem,
    wear_logs: &[WearLog],
    now: DateTime<Utc>,
) -> ItemAnalytics {
    let times_worn = wear_logs.len();
    let days_owned = calculate_days_owned(&item.purchase_date, now);

    ItemAnalytics {
        item_id: item.id.clone(),
        times_worn,
        cost_per_wear: calculate_cost_per_wear(item.purchase_price, times_worn),
        days_since_last_wear: calculate_days_since_last_wear(wear_logs, now),
        days_owned,
        wear_frequency: calculate_wear_frequency(times_worn, days_owned),
    }
}

/// Analytics for an item looked up in a grouped wear-log map.
/// Items missing from the map are treated as never worn.
pub fn analytics_for(
    item: &ClothingItem,
    wear_logs_by_item: &WearLogsByItem,
    now: DateTime<Utc>,
) -> ItemAnalytics {
    calculate_item_analytics(item, logs_for(wear_logs_by_item, &item.id), now)
}

/// Wear logs recorded for `item_id`, empty when it has none
pub fn logs_for<'a>(wear_logs_by_item: &'a WearLogsByItem, item_id: &str) -> &'a [WearLog] {
    wear_logs_by_item
        .get(item_id)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Group wear logs by the item they belong to.
///
/// Every item gets an entry, empty if it was never worn. Logs that reference
/// an item not in `items` are dropped. Log order within a group follows the
/// input order.
pub fn group_wear_logs_by_item(items: &[ClothingItem], wear_logs: &[WearLog]) -> WearLogsByItem {
    let mut grouped: WearLogsByItem = items
        .iter()
        .map(|item| (item.id.clone(), Vec::new()))
        .collect();

    let mut orphaned = 0usize;
    for log in wear_logs {
        match grouped.get_mut(&log.item_id) {
            Some(logs) => logs.push(log.clone()),
            None => orphaned += 1,
        }
    }

    if orphaned > 0 {
        debug!("Dropped {} wear logs referencing unknown items", orphaned);
    }

    grouped
}
