//! Wardrobe service domain logic.
//!
//! This module contains the business logic for the clothing catalog and the
//! wear history that drives every analytic in the app.
//!
//! ## Key Responsibilities
//!
//! - **Catalog CRUD**: Creating, reading, updating, and deleting items
//! - **Wear Logging**: Recording wears, defaulting to the current time
//! - **Closet Filtering**: Category and free-text search over the catalog
//! - **Analytics**: Per-item metrics, wardrobe insights and stagnant items
//!
//! ## Business Rules
//!
//! - Items need a non-blank name and a photo
//! - Purchase price is never negative and purchase date never in the future
//! - Deleting an item deletes its wear history
//! - Wears can only be logged against existing items

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use shared::{
    ClothingItem, CreateItemRequest, DeleteItemResponse, ItemAnalytics, ItemListRequest,
    LogWearRequest, LogWearResponse, UpdateItemRequest, WardrobeInsights, WearLog,
};
use std::sync::Arc;

use crate::domain::analytics::{analytics_for, calculate_item_analytics, group_wear_logs_by_item, WearLogsByItem};
use crate::domain::clock::Clock;
use crate::domain::date_math::parse_date;
use crate::domain::stagnation::StagnationDetector;
use crate::storage::{Connection, ItemStorage, WearLogStorage};

/// Items listed under "most worn" in the insights
const MOST_WORN_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ItemValidationError {
    #[error("Item name is required")]
    EmptyName,
    #[error("A photo of the item is required")]
    MissingPhoto,
    #[error("Purchase price must be zero or more")]
    NegativePrice,
    #[error("Invalid purchase date: {0}")]
    InvalidPurchaseDate(String),
    #[error("Purchase date cannot be in the future")]
    PurchaseDateInFuture,
    #[error("Invalid wear date: {0}")]
    InvalidWearDate(String),
    #[error("Wear date cannot be in the future")]
    WearDateInFuture,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Item not found: {0}")]
pub struct ItemNotFound(pub String);

/// Catalog, wear history and analytics over a storage connection
#[derive(Clone)]
pub struct WardrobeService<C: Connection> {
    item_repository: C::ItemRepository,
    wear_log_repository: C::WearLogRepository,
    clock: Arc<dyn Clock>,
    stagnation: StagnationDetector,
}

impl<C: Connection> WardrobeService<C> {
    pub fn new(connection: Arc<C>, clock: Arc<dyn Clock>, stagnation: StagnationDetector) -> Self {
        Self {
            item_repository: connection.create_item_repository(),
            wear_log_repository: connection.create_wear_log_repository(),
            clock,
            stagnation,
        }
    }

    fn now_rfc3339(&self) -> String {
        self.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Items matching the closet filters, newest first
    pub async fn list_items(&self, request: &ItemListRequest) -> Result<Vec<ClothingItem>> {
        let items = self.item_repository.list_items().await?;
        Ok(filter_items(items, request))
    }

    pub async fn get_item(&self, item_id: &str) -> Result<Option<ClothingItem>> {
        self.item_repository.get_item(item_id).await
    }

    async fn require_item(&self, item_id: &str) -> Result<ClothingItem> {
        match self.item_repository.get_item(item_id).await? {
            Some(item) => Ok(item),
            None => Err(ItemNotFound(item_id.to_string()).into()),
        }
    }

    /// Catalog a new item
    pub async fn create_item(&self, request: CreateItemRequest) -> Result<ClothingItem> {
        info!("Creating item: {} ({})", request.name, request.category);
        let now = self.clock.now();

        validate_fields(&request.name, &request.photo_uri, request.purchase_price)?;
        validate_purchase_date(&request.purchase_date, now)?;

        let timestamp = self.now_rfc3339();
        let item = ClothingItem {
            id: ClothingItem::generate_id(),
            name: request.name.trim().to_string(),
            category: request.category,
            brand: non_blank(request.brand),
            size: non_blank(request.size),
            colors: request.colors,
            material: non_blank(request.material),
            purchase_price: request.purchase_price,
            purchase_date: request.purchase_date,
            photo_uri: request.photo_uri,
            care_instructions: non_blank(request.care_instructions),
            tags: request.tags,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        self.item_repository.store_item(&item).await?;
        info!("Created item {}", item.id);
        Ok(item)
    }

    /// Apply the provided fields to an existing item
    pub async fn update_item(&self, item_id: &str, request: UpdateItemRequest) -> Result<ClothingItem> {
        let mut item = self.require_item(item_id).await?;

        if let Some(name) = request.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = request.category {
            item.category = category;
        }
        if let Some(brand) = request.brand {
            item.brand = non_blank(Some(brand));
        }
        if let Some(size) = request.size {
            item.size = non_blank(Some(size));
        }
        if let Some(colors) = request.colors {
            item.colors = colors;
        }
        if let Some(material) = request.material {
            item.material = non_blank(Some(material));
        }
        if let Some(price) = request.purchase_price {
            item.purchase_price = price;
        }
        if let Some(purchase_date) = request.purchase_date {
            item.purchase_date = purchase_date;
        }
        if let Some(photo_uri) = request.photo_uri {
            item.photo_uri = photo_uri;
        }
        if let Some(care) = request.care_instructions {
            item.care_instructions = non_blank(Some(care));
        }
        if let Some(tags) = request.tags {
            item.tags = tags;
        }

        validate_fields(&item.name, &item.photo_uri, item.purchase_price)?;
        validate_purchase_date(&item.purchase_date, self.clock.now())?;
        item.updated_at = self.now_rfc3339();

        if !self.item_repository.update_item(&item).await? {
            return Err(ItemNotFound(item_id.to_string()).into());
        }
        info!("Updated item {}", item_id);
        Ok(item)
    }

    /// Delete an item and its wear history
    pub async fn delete_item(&self, item_id: &str) -> Result<DeleteItemResponse> {
        let item = self.require_item(item_id).await?;
        let deleted_wear_logs = self
            .wear_log_repository
            .delete_wear_logs_for_item(item_id)
            .await?;

        if !self.item_repository.delete_item(item_id).await? {
            return Err(ItemNotFound(item_id.to_string()).into());
        }

        info!("Deleted item {} with {} wear logs", item_id, deleted_wear_logs);
        Ok(DeleteItemResponse {
            item_id: item_id.to_string(),
            deleted_wear_logs,
            success_message: format!("Deleted {}", item.name),
        })
    }

    /// Record a wear and return the item's refreshed analytics
    pub async fn log_wear(&self, item_id: &str, request: LogWearRequest) -> Result<LogWearResponse> {
        let item = self.require_item(item_id).await?;

        let wear_date = match request.wear_date {
            Some(date) if !date.trim().is_empty() => {
                validate_wear_date(&date, self.clock.now())?;
                date
            }
            _ => self.now_rfc3339(),
        };

        let wear_log = WearLog {
            id: WearLog::generate_id(item_id),
            item_id: item_id.to_string(),
            wear_date,
        };
        self.wear_log_repository.store_wear_log(&wear_log).await?;

        let logs = self.wear_log_repository.list_wear_logs_for_item(item_id).await?;
        let analytics = calculate_item_analytics(&item, &logs, self.clock.now());
        info!("Logged wear {} of {}", analytics.times_worn, item_id);

        Ok(LogWearResponse {
            wear_log,
            success_message: format!("Logged a wear of {}", item.name),
            analytics,
        })
    }

    /// Wear history of one item, newest first
    pub async fn list_wear_logs(&self, item_id: &str) -> Result<Vec<WearLog>> {
        self.require_item(item_id).await?;
        self.wear_log_repository.list_wear_logs_for_item(item_id).await
    }

    pub async fn item_analytics(&self, item_id: &str) -> Result<ItemAnalytics> {
        let item = self.require_item(item_id).await?;
        let logs = self.wear_log_repository.list_wear_logs_for_item(item_id).await?;
        Ok(calculate_item_analytics(&item, &logs, self.clock.now()))
    }

    /// Every item plus its wear logs, the input to all wardrobe-wide analytics
    pub async fn load_wardrobe(&self) -> Result<(Vec<ClothingItem>, WearLogsByItem)> {
        let items = self.item_repository.list_items().await?;
        let wear_logs = self.wear_log_repository.list_wear_logs().await?;
        let grouped = group_wear_logs_by_item(&items, &wear_logs);
        Ok((items, grouped))
    }

    pub async fn stagnant_items(&self) -> Result<Vec<ClothingItem>> {
        let (items, grouped) = self.load_wardrobe().await?;
        Ok(self
            .stagnation
            .identify_stagnant_items(&items, &grouped, self.clock.now()))
    }

    /// Wardrobe-wide totals, most worn items and stagnant items
    pub async fn insights(&self) -> Result<WardrobeInsights> {
        let (items, grouped) = self.load_wardrobe().await?;
        Ok(build_insights(&items, &grouped, &self.stagnation, self.clock.now()))
    }
}

fn build_insights(
    items: &[ClothingItem],
    grouped: &WearLogsByItem,
    stagnation: &StagnationDetector,
    now: DateTime<Utc>,
) -> WardrobeInsights {
    let item_analytics: Vec<ItemAnalytics> = items
        .iter()
        .map(|item| analytics_for(item, grouped, now))
        .collect();

    let total_wears: usize = item_analytics.iter().map(|a| a.times_worn).sum();
    let total_spent: f64 = items.iter().map(|item| item.purchase_price).sum();
    let avg_cost_per_wear = if total_wears > 0 {
        total_spent / total_wears as f64
    } else {
        total_spent
    };

    let mut by_wears: Vec<(&ClothingItem, usize)> = items
        .iter()
        .zip(item_analytics.iter().map(|a| a.times_worn))
        .collect();
    by_wears.sort_by(|a, b| b.1.cmp(&a.1));
    let most_worn = by_wears
        .into_iter()
        .take(MOST_WORN_LIMIT)
        .map(|(item, _)| item.clone())
        .collect();

    let stagnant_items = items
        .iter()
        .zip(item_analytics.iter())
        .filter(|(_, analytics)| stagnation.is_stagnant(analytics))
        .map(|(item, _)| item.clone())
        .collect();

    WardrobeInsights {
        total_items: items.len(),
        total_wears,
        total_spent,
        avg_cost_per_wear,
        most_worn,
        stagnant_items,
        item_analytics,
    }
}

/// Apply the category filter, then a case-insensitive search over name,
/// brand and tags
pub fn filter_items(items: Vec<ClothingItem>, request: &ItemListRequest) -> Vec<ClothingItem> {
    let query = request
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    items
        .into_iter()
        .filter(|item| request.category.map_or(true, |c| item.category == c))
        .filter(|item| match &query {
            Some(q) => matches_query(item, q),
            None => true,
        })
        .collect()
}

fn matches_query(item: &ClothingItem, query: &str) -> bool {
    item.name.to_lowercase().contains(query)
        || item
            .brand
            .as_deref()
            .map_or(false, |brand| brand.to_lowercase().contains(query))
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(query))
}

fn validate_fields(name: &str, photo_uri: &str, purchase_price: f64) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    if photo_uri.trim().is_empty() {
        return Err(ItemValidationError::MissingPhoto);
    }
    // NaN fails this comparison too
    if !(purchase_price >= 0.0) {
        return Err(ItemValidationError::NegativePrice);
    }
    Ok(())
}

fn validate_purchase_date(purchase_date: &str, now: DateTime<Utc>) -> Result<(), ItemValidationError> {
    match parse_date(purchase_date) {
        None => Err(ItemValidationError::InvalidPurchaseDate(purchase_date.to_string())),
        Some(date) if date > now => {
            warn!("Rejected purchase date in the future: {}", purchase_date);
            Err(ItemValidationError::PurchaseDateInFuture)
        }
        Some(_) => Ok(()),
    }
}

fn validate_wear_date(wear_date: &str, now: DateTime<Utc>) -> Result<(), ItemValidationError> {
    match parse_date(wear_date) {
        None => Err(ItemValidationError::InvalidWearDate(wear_date.to_string())),
        Some(date) if date > now => {
            warn!("Rejected wear date in the future: {}", wear_date);
            Err(ItemValidationError::WearDateInFuture)
        }
        Some(_) => Ok(()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
