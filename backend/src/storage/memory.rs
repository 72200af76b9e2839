//! In-memory storage backend.
//!
//! Items and wear logs live in a single shared state so that deleting an
//! item can cascade to its wear logs atomically.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use shared::{ClothingItem, WearLog};
use std::cmp::Reverse;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{Connection, ItemStorage, WearLogStorage};
use crate::domain::date_math::parse_date;

#[derive(Debug, Default)]
struct MemoryState {
    items: Vec<ClothingItem>,
    wear_logs: Vec<WearLog>,
}

/// Shared handle to an in-memory wardrobe. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a connection pre-populated with items and wear logs
    pub fn with_data(items: Vec<ClothingItem>, wear_logs: Vec<WearLog>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState { items, wear_logs })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Connection for MemoryConnection {
    type ItemRepository = MemoryItemRepository;
    type WearLogRepository = MemoryWearLogRepository;

    fn create_item_repository(&self) -> Self::ItemRepository {
        MemoryItemRepository {
            connection: self.clone(),
        }
    }

    fn create_wear_log_repository(&self) -> Self::WearLogRepository {
        MemoryWearLogRepository {
            connection: self.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryItemRepository {
    connection: MemoryConnection,
}

#[async_trait]
impl ItemStorage for MemoryItemRepository {
    async fn list_items(&self) -> Result<Vec<ClothingItem>> {
        let mut items = self.connection.lock().items.clone();
        items.sort_by_key(|item| Reverse(parse_date(&item.created_at)));
        Ok(items)
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<ClothingItem>> {
        let state = self.connection.lock();
        Ok(state.items.iter().find(|item| item.id == item_id).cloned())
    }

    async fn store_item(&self, item: &ClothingItem) -> Result<()> {
        let mut state = self.connection.lock();
        if state.items.iter().any(|existing| existing.id == item.id) {
            return Err(anyhow!("Item {} already exists", item.id));
        }
        state.items.push(item.clone());
        debug!("Stored item {}", item.id);
        Ok(())
    }

    async fn update_item(&self, item: &ClothingItem) -> Result<bool> {
        let mut state = self.connection.lock();
        match state.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_item(&self, item_id: &str) -> Result<bool> {
        let mut state = self.connection.lock();
        let before = state.items.len();
        state.items.retain(|item| item.id != item_id);
        if state.items.len() == before {
            return Ok(false);
        }

        let logs_before = state.wear_logs.len();
        state.wear_logs.retain(|log| log.item_id != item_id);
        info!(
            "Deleted item {} and {} wear logs",
            item_id,
            logs_before - state.wear_logs.len()
        );
        Ok(true)
    }
}

#[derive(Debug, Clone)]
pub struct MemoryWearLogRepository {
    connection: MemoryConnection,
}

fn newest_first(mut logs: Vec<WearLog>) -> Vec<WearLog> {
    logs.sort_by_key(|log| Reverse(parse_date(&log.wear_date)));
    logs
}

#[async_trait]
impl WearLogStorage for MemoryWearLogRepository {
    async fn list_wear_logs_for_item(&self, item_id: &str) -> Result<Vec<WearLog>> {
        let state = self.connection.lock();
        let logs = state
            .wear_logs
            .iter()
            .filter(|log| log.item_id == item_id)
            .cloned()
            .collect();
        Ok(newest_first(logs))
    }

    async fn list_wear_logs(&self) -> Result<Vec<WearLog>> {
        let logs = self.connection.lock().wear_logs.clone();
        Ok(newest_first(logs))
    }

    async fn store_wear_log(&self, wear_log: &WearLog) -> Result<()> {
        let mut state = self.connection.lock();
        if !state.items.iter().any(|item| item.id == wear_log.item_id) {
            return Err(anyhow!("Cannot log wear for unknown item {}", wear_log.item_id));
        }
        state.wear_logs.push(wear_log.clone());
        Ok(())
    }

    async fn delete_wear_logs_for_item(&self, item_id: &str) -> Result<usize> {
        let mut state = self.connection.lock();
        let before = state.wear_logs.len();
        state.wear_logs.retain(|log| log.item_id != item_id);
        Ok(before - state.wear_logs.len())
    }
}
