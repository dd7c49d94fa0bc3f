//! Persistent storage for items and user stats
//!
//! The queue core never touches storage; the [`Tracker`](crate::Tracker)
//! reads a snapshot through the [`Storage`] trait, runs the pure functions
//! and writes the results back.

use crate::error::{Result, TrackerError};
use crate::item::{Item, ItemId};
use crate::stats::UserStats;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

/// Storage interface for items and the stats aggregate
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load every item, in any order
    async fn load_items(&self) -> Result<Vec<Item>>;

    /// Load one item
    async fn load_item(&self, id: &str) -> Result<Option<Item>>;

    /// Insert or replace an item
    async fn save_item(&self, item: Item) -> Result<()>;

    /// Insert or replace several items at once
    async fn save_items(&self, items: Vec<Item>) -> Result<()>;

    /// Delete an item; returns whether it existed
    async fn remove_item(&self, id: &str) -> Result<bool>;

    /// Load the stats aggregate (default when never saved)
    async fn load_stats(&self) -> Result<UserStats>;

    /// Replace the stats aggregate
    async fn save_stats(&self, stats: UserStats) -> Result<()>;

    /// Clear all storage (items and stats)
    async fn clear_all(&self) -> Result<()>;
}

/// Local filesystem-based storage implementation
pub struct LocalStorage {
    /// Directory path for storage files
    storage_dir: PathBuf,
    /// In-memory cache of items
    items: RwLock<HashMap<ItemId, Item>>,
    /// In-memory cache of stats
    stats: RwLock<UserStats>,
}

impl LocalStorage {
    /// Create a new LocalStorage with the specified directory
    ///
    /// The directory will be created if it doesn't exist.
    pub async fn new(storage_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&storage_dir).await.map_err(|e| {
            TrackerError::StorageError(format!("Failed to create storage directory: {}", e))
        })?;

        let storage = Self {
            storage_dir,
            items: RwLock::new(HashMap::new()),
            stats: RwLock::new(UserStats::default()),
        };

        storage.load_from_disk().await;

        Ok(storage)
    }

    fn items_path(&self) -> PathBuf {
        self.storage_dir.join("items.json")
    }

    fn stats_path(&self) -> PathBuf {
        self.storage_dir.join("stats.json")
    }

    /// Load data from disk into memory; unreadable files start empty
    async fn load_from_disk(&self) {
        if let Ok(data) = fs::read_to_string(self.items_path()).await {
            match serde_json::from_str::<Vec<Item>>(&data) {
                Ok(items) => {
                    let mut cache = self.items.write().await;
                    for item in items {
                        cache.insert(item.id.clone(), item);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Ignoring unreadable items file"),
            }
        }

        if let Ok(data) = fs::read_to_string(self.stats_path()).await {
            match serde_json::from_str::<UserStats>(&data) {
                Ok(stats) => *self.stats.write().await = stats,
                Err(e) => tracing::warn!(error = %e, "Ignoring unreadable stats file"),
            }
        }
    }

    /// Persist items to disk, oldest first
    async fn persist_items(&self) -> Result<()> {
        let items = self.items.read().await;
        let mut items_vec: Vec<&Item> = items.values().collect();
        items_vec.sort_by(|a, b| a.saved_at.cmp(&b.saved_at).then_with(|| a.id.cmp(&b.id)));
        let json = serde_json::to_string_pretty(&items_vec).map_err(|e| {
            TrackerError::StorageError(format!("Failed to serialize items: {}", e))
        })?;

        fs::write(self.items_path(), json).await.map_err(|e| {
            TrackerError::StorageError(format!("Failed to write items file: {}", e))
        })?;

        Ok(())
    }

    async fn persist_stats(&self) -> Result<()> {
        let stats = self.stats.read().await;
        let json = serde_json::to_string_pretty(&*stats).map_err(|e| {
            TrackerError::StorageError(format!("Failed to serialize stats: {}", e))
        })?;

        fs::write(self.stats_path(), json).await.map_err(|e| {
            TrackerError::StorageError(format!("Failed to write stats file: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn load_items(&self) -> Result<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn load_item(&self, id: &str) -> Result<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(id).cloned())
    }

    async fn save_item(&self, item: Item) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(item.id.clone(), item);
        drop(items);

        self.persist_items().await
    }

    async fn save_items(&self, batch: Vec<Item>) -> Result<()> {
        let mut items = self.items.write().await;
        for item in batch {
            items.insert(item.id.clone(), item);
        }
        drop(items);

        self.persist_items().await
    }

    async fn remove_item(&self, id: &str) -> Result<bool> {
        let mut items = self.items.write().await;
        let existed = items.remove(id).is_some();
        drop(items);

        if existed {
            self.persist_items().await?;
        }
        Ok(existed)
    }

    async fn load_stats(&self) -> Result<UserStats> {
        Ok(*self.stats.read().await)
    }

    async fn save_stats(&self, stats: UserStats) -> Result<()> {
        *self.stats.write().await = stats;
        self.persist_stats().await
    }

    async fn clear_all(&self) -> Result<()> {
        self.items.write().await.clear();
        *self.stats.write().await = UserStats::default();

        let _ = fs::remove_file(self.items_path()).await;
        let _ = fs::remove_file(self.stats_path()).await;

        Ok(())
    }
}
