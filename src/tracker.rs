//! Tracker provides the high-level reading workflow over a storage backend

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::event::{events, EventEmitter, EventPayload, EventStream, TrackerEvent};
use crate::item::{Item, ItemId, NewItem, Verdict};
use crate::lanes::{self, FilteredQueue, MultiQueueResult};
use crate::priority;
use crate::stats::{self, UserStats};
use crate::storage::Storage;
use crate::verdict;
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tracker
///
/// Every operation reads a fresh snapshot from storage; nothing is cached.
/// Every write goes through one lock, so a snapshot taken by one operation
/// cannot overwrite another operation's changes within this process.
pub struct Tracker {
    storage: Arc<dyn Storage>,
    config: TrackerConfig,
    event_emitter: EventEmitter,
    write_lock: Mutex<()>,
}

impl Tracker {
    /// Get the configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Get the storage backend
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    /// Subscribe to tracker events
    pub fn subscribe(&self) -> EventStream {
        self.event_emitter.subscribe_stream()
    }

    /// Save a new item into the queue
    pub async fn add_item(&self, new_item: NewItem) -> Result<Item> {
        self.add_item_at(new_item, Utc::now()).await
    }

    /// Save a new item into the queue with an explicit save time
    pub async fn add_item_at(&self, new_item: NewItem, saved_at: DateTime<Utc>) -> Result<Item> {
        let item = new_item.into_item(saved_at);
        let _guard = self.write_lock.lock().await;
        self.storage.save_item(item.clone()).await?;
        tracing::debug!(item_id = %item.id, tags = ?item.tags, "Item saved");
        self.event_emitter.emit(TrackerEvent::item_saved(&item.id));
        Ok(item)
    }

    /// Get an item by id
    pub async fn get_item(&self, id: &str) -> Result<Item> {
        self.storage
            .load_item(id)
            .await?
            .ok_or_else(|| TrackerError::ItemNotFound(id.to_string()))
    }

    /// Delete an item
    pub async fn remove_item(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.storage.remove_item(id).await? {
            return Err(TrackerError::ItemNotFound(id.to_string()));
        }
        self.event_emitter.emit(TrackerEvent::new(
            events::ITEM_REMOVED,
            EventPayload::String(id.to_string()),
        ));
        Ok(())
    }

    /// Lane picks for the whole queue, or for one tag
    pub async fn next_up(&self, tag: Option<&str>) -> Result<MultiQueueResult> {
        self.next_up_at(tag, Utc::now()).await
    }

    /// Lane picks as of `now`; due revisits are returned to the queue first
    pub async fn next_up_at(&self, tag: Option<&str>, now: DateTime<Utc>) -> Result<MultiQueueResult> {
        self.release_due_revisits_at(now).await?;
        let items = self.storage.load_items().await?;
        let recent = lanes::recent_verdict_tags(&items, self.config.recent_verdict_limit);
        let result = lanes::get_multi_queue_for_tag(&items, &recent, tag);
        tracing::debug!(
            total_queued = result.total_queued,
            picks = result.picks().count(),
            tag = ?tag,
            "Computed next-up lanes"
        );
        Ok(result)
    }

    /// Oldest-first reading order for one tag
    pub async fn filtered_queue(&self, tag: &str) -> Result<FilteredQueue> {
        let items = self.storage.load_items().await?;
        Ok(lanes::filtered_queue(&items, tag, self.config.upcoming_limit))
    }

    /// Kept items, most recently decided first
    pub async fn backlog(&self) -> Result<Vec<Item>> {
        let items = self.storage.load_items().await?;
        Ok(lanes::backlog(&items))
    }

    /// Every tag in use, sorted
    pub async fn tags(&self) -> Result<Vec<String>> {
        let items = self.storage.load_items().await?;
        Ok(lanes::all_tags(&items))
    }

    /// Record that an item was read
    pub async fn mark_read(&self, id: &str) -> Result<Item> {
        let _guard = self.write_lock.lock().await;
        let mut item = self.get_item(id).await?;
        verdict::mark_read(&mut item, Utc::now())?;
        self.storage.save_item(item.clone()).await?;
        Ok(item)
    }

    /// Record the reader's takeaway for an item
    pub async fn save_takeaway(&self, id: &str, takeaway: &str) -> Result<Item> {
        let _guard = self.write_lock.lock().await;
        let mut item = self.get_item(id).await?;
        verdict::save_takeaway(&mut item, takeaway, Utc::now())?;
        self.storage.save_item(item.clone()).await?;
        Ok(item)
    }

    /// Decide an item and update stats and streak
    pub async fn submit_verdict(&self, id: &str, verdict: Verdict) -> Result<Item> {
        self.submit_verdict_at(id, verdict, Utc::now()).await
    }

    /// Decide an item at an explicit time
    pub async fn submit_verdict_at(
        &self,
        id: &str,
        verdict: Verdict,
        at: DateTime<Utc>,
    ) -> Result<Item> {
        let _guard = self.write_lock.lock().await;

        let mut item = self.get_item(id).await?;
        verdict::apply_verdict(&mut item, verdict, at, self.config.revisit_delay)?;

        let before = self.storage.load_stats().await?;
        let after = stats::record_verdict_stats(before, verdict, at, &Local);

        self.storage.save_item(item.clone()).await?;
        self.storage.save_stats(after).await?;

        tracing::info!(
            item_id = %item.id,
            verdict = %verdict,
            streak = after.streak.current,
            "Verdict recorded"
        );
        self.event_emitter
            .emit(TrackerEvent::verdict_recorded(&item.id, verdict));
        if let Some(event) = TrackerEvent::streak_change(&before.streak, &after.streak) {
            self.event_emitter.emit(event);
        }

        Ok(item)
    }

    /// Return revisited items whose delay has passed to the queue
    pub async fn release_due_revisits(&self) -> Result<Vec<ItemId>> {
        self.release_due_revisits_at(Utc::now()).await
    }

    /// Return revisited items due at `now` to the queue
    pub async fn release_due_revisits_at(&self, now: DateTime<Utc>) -> Result<Vec<ItemId>> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.storage.load_items().await?;
        let released = verdict::release_due_revisits(&mut items, now);
        if released.is_empty() {
            return Ok(released);
        }

        let changed: Vec<Item> = items
            .into_iter()
            .filter(|i| released.contains(&i.id))
            .collect();
        self.storage.save_items(changed).await?;

        tracing::info!(count = released.len(), "Released due revisits");
        for id in &released {
            self.event_emitter.emit(TrackerEvent::new(
                events::ITEM_REVISIT_RELEASED,
                EventPayload::String(id.clone()),
            ));
        }
        Ok(released)
    }

    /// Rescore every queued item and store the scores
    pub async fn recalculate_priorities(&self) -> Result<usize> {
        self.recalculate_priorities_at(Utc::now()).await
    }

    /// Rescore every queued item as of `now`
    pub async fn recalculate_priorities_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.storage.load_items().await?;

        let window = chrono::Duration::from_std(self.config.recent_tag_window)
            .map_err(|e| TrackerError::ConfigError(format!("recent tag window: {}", e)))?;
        let recent = priority::recent_tags_since(&items, now - window);
        let engagement = priority::source_engagement(&items);

        let scored = priority::recalculate_priorities(
            &mut items,
            &recent,
            &engagement,
            now,
            &self.config.priority_weights,
        );
        let queued: Vec<Item> = items.into_iter().filter(|i| i.is_queued()).collect();
        self.storage.save_items(queued).await?;

        tracing::info!(scored, "Recalculated priorities");
        self.event_emitter
            .emit(TrackerEvent::empty(events::PRIORITIES_RECALCULATED));
        Ok(scored)
    }

    /// Current stats
    pub async fn stats(&self) -> Result<UserStats> {
        self.storage.load_stats().await
    }

    /// Zero the weekly counters
    pub async fn reset_weekly_stats(&self) -> Result<UserStats> {
        let _guard = self.write_lock.lock().await;
        let next = stats::reset_weekly(self.storage.load_stats().await?);
        self.storage.save_stats(next).await?;
        Ok(next)
    }
}

/// Tracker builder
pub struct TrackerBuilder {
    storage: Arc<dyn Storage>,
    config: TrackerConfig,
    event_emitter: Option<EventEmitter>,
}

impl TrackerBuilder {
    /// Create a new tracker builder over a storage backend
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            config: TrackerConfig::default(),
            event_emitter: None,
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing event emitter
    pub fn with_event_emitter(mut self, emitter: EventEmitter) -> Self {
        self.event_emitter = Some(emitter);
        self
    }

    /// Build the tracker
    pub fn build(self) -> Result<Tracker> {
        self.config.validate()?;
        tracing::info!(
            recent_verdict_limit = self.config.recent_verdict_limit,
            "Tracker ready"
        );
        Ok(Tracker {
            storage: self.storage,
            config: self.config,
            event_emitter: self.event_emitter.unwrap_or_default(),
            write_lock: Mutex::new(()),
        })
    }
}
