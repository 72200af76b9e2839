//! # Storage Traits
//!
//! Storage abstraction traits that let different storage backends be used
//! interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::{ClothingItem, WearLog};

/// Storage operations for clothing items
#[async_trait]
pub trait ItemStorage: Send + Sync {
    /// All items, newest first by creation time
    async fn list_items(&self) -> Result<Vec<ClothingItem>>;

    async fn get_item(&self, item_id: &str) -> Result<Option<ClothingItem>>;

    /// Store a new item. Fails if the id is already taken.
    async fn store_item(&self, item: &ClothingItem) -> Result<()>;

    /// Replace an existing item.
    /// Returns true if the item was found and updated, false otherwise
    async fn update_item(&self, item: &ClothingItem) -> Result<bool>;

    /// Delete an item together with all of its wear logs.
    /// Returns true if the item was found and deleted, false otherwise
    async fn delete_item(&self, item_id: &str) -> Result<bool>;
}

/// Storage operations for wear logs
#[async_trait]
pub trait WearLogStorage: Send + Sync {
    /// Wear logs of one item, newest first
    async fn list_wear_logs_for_item(&self, item_id: &str) -> Result<Vec<WearLog>>;

    /// Every wear log, newest first
    async fn list_wear_logs(&self) -> Result<Vec<WearLog>>;

    /// Append a wear log. The referenced item must exist.
    async fn store_wear_log(&self, wear_log: &WearLog) -> Result<()>;

    /// Remove all wear logs of an item, returning how many were removed
    async fn delete_wear_logs_for_item(&self, item_id: &str) -> Result<usize>;
}

/// A storage backend able to hand out repositories
pub trait Connection: Send + Sync + Clone {
    type ItemRepository: ItemStorage + Clone;
    type WearLogRepository: WearLogStorage + Clone;

    fn create_item_repository(&self) -> Self::ItemRepository;

    fn create_wear_log_repository(&self) -> Self::WearLogRepository;
}
