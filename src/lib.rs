//! # Readlane
//!
//! Queue selection, priority scoring and streak tracking for a personal
//! "read later" queue.
//!
//! ## Core
//!
//! - Three-lane "what's next" selection (oldest, mix up, quick) with
//!   cross-lane exclusion and tag filtering
//! - Weighted priority scoring from age, topic diversity, source affinity
//!   and revisit history
//! - Daily reading streak and keep/discard/revisit counters
//! - Read → reflect → decide transitions, with timed revisits
//! - Persistent storage (pluggable `Storage` trait, `LocalStorage` included)
//! - Event system for tracker notifications
//!
//! The selection and scoring functions are pure: they take a snapshot of
//! items and never touch storage or the clock. [`Tracker`] wires them to a
//! [`Storage`] backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use readlane::{LocalStorage, NewItem, SourceData, TrackerBuilder, Verdict};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> readlane::Result<()> {
//!     let storage = LocalStorage::new("./reading".into()).await?;
//!     let tracker = TrackerBuilder::new(Arc::new(storage)).build()?;
//!
//!     let item = tracker
//!         .add_item(
//!             NewItem::new("Rust async", SourceData::link("https://example.com"))
//!                 .with_estimated_minutes(8)
//!                 .with_tags(["Rust"]),
//!         )
//!         .await?;
//!
//!     let next = tracker.next_up(None).await?;
//!     for pick in next.picks() {
//!         println!("{}: {}", pick.reason, pick.item.title);
//!     }
//!
//!     tracker.submit_verdict(&item.id, Verdict::Keep).await?;
//!     println!("streak: {}", tracker.stats().await?.streak.current);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod item;
pub mod lanes;
pub mod priority;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod tracker;
pub mod verdict;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use event::{events, EventEmitter, EventPayload, EventStream, TrackerEvent};
pub use item::{Item, ItemId, ItemStatus, NewItem, SourceData, Verdict};
pub use lanes::{
    all_tags, backlog, filter_by_tag, filtered_queue, get_multi_queue_for_tag,
    get_multi_queue_items, recent_verdict_tags, FilteredQueue, MultiQueueResult, QueueItem,
    QueueType,
};
pub use priority::{
    calculate_priority, calculate_priority_at, calculate_priority_with, recalculate_priorities,
    PriorityFactors, PriorityWeights,
};
pub use stats::UserStats;
pub use storage::{LocalStorage, Storage};
pub use streak::{update_streak, update_streak_in, Streak};
pub use tracker::{Tracker, TrackerBuilder};
