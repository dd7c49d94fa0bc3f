//! Tracker notifications
//!
//! The [`Tracker`](crate::Tracker) emits an event whenever it changes stored
//! state, so a presentation layer can refresh without polling.

use crate::item::Verdict;
use crate::streak::Streak;
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::broadcast;

/// Event key type
pub type EventKey = String;

/// Event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
    Empty,
    String(String),
    Map(HashMap<String, serde_json::Value>),
}

impl EventPayload {
    /// Look up a field of a map payload
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        match self {
            EventPayload::Map(map) => map.get(field),
            _ => None,
        }
    }
}

/// Tracker event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerEvent {
    /// Event key (e.g., "item.verdict.recorded", "streak.extended")
    pub key: EventKey,

    /// Event payload
    pub payload: EventPayload,

    /// Timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TrackerEvent {
    /// Create a new event
    pub fn new(key: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            key: key.into(),
            payload,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create an event with no payload
    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, EventPayload::Empty)
    }

    /// Create an event with a map payload
    pub fn with_map(key: impl Into<String>, map: HashMap<String, serde_json::Value>) -> Self {
        Self::new(key, EventPayload::Map(map))
    }

    pub fn item_saved(item_id: &str) -> Self {
        Self::new(events::ITEM_SAVED, EventPayload::String(item_id.to_string()))
    }

    pub fn verdict_recorded(item_id: &str, verdict: Verdict) -> Self {
        Self::with_map(
            events::ITEM_VERDICT_RECORDED,
            HashMap::from([
                ("item_id".to_string(), serde_json::json!(item_id)),
                ("verdict".to_string(), serde_json::json!(verdict)),
            ]),
        )
    }

    /// Streak event for the transition `before` → `after`, if the count moved
    pub fn streak_change(before: &Streak, after: &Streak) -> Option<Self> {
        let key = if after.current > before.current {
            events::STREAK_EXTENDED
        } else if after.current < before.current {
            events::STREAK_BROKEN
        } else {
            return None;
        };
        Some(Self::with_map(
            key,
            HashMap::from([
                ("current".to_string(), serde_json::json!(after.current)),
                ("longest".to_string(), serde_json::json!(after.longest)),
            ]),
        ))
    }
}

/// Event emitter
#[derive(Clone)]
pub struct EventEmitter {
    sender: Arc<broadcast::Sender<TrackerEvent>>,
}

impl EventEmitter {
    /// Create a new event emitter
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Emit an event; dropped silently when nobody listens
    pub fn emit(&self, event: TrackerEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.sender.subscribe()
    }

    /// Subscribe to filtered events as an `EventStream` (implements `Stream`)
    pub fn subscribe_filtered(
        &self,
        filter: impl Fn(&TrackerEvent) -> bool + Send + Sync + 'static,
    ) -> EventStream {
        use tokio_stream::wrappers::BroadcastStream;
        use tokio_stream::StreamExt as TokioStreamExt;
        let stream = BroadcastStream::new(self.sender.subscribe())
            .filter_map(|r: Result<TrackerEvent, _>| r.ok())
            .filter(move |e| filter(e));
        EventStream {
            inner: Box::pin(stream),
        }
    }

    /// Subscribe to all events as an `EventStream` (implements `Stream`)
    pub fn subscribe_stream(&self) -> EventStream {
        self.subscribe_filtered(|_| true)
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Event stream, returned by [`EventEmitter::subscribe_filtered`] and
/// [`EventEmitter::subscribe_stream`]
pub struct EventStream {
    inner: Pin<Box<dyn Stream<Item = TrackerEvent> + Send>>,
}

impl Stream for EventStream {
    type Item = TrackerEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl EventStream {
    /// Receive the next matching event
    pub async fn recv(&mut self) -> Option<TrackerEvent> {
        use tokio_stream::StreamExt;
        self.next().await
    }
}

/// Event catalog - predefined event keys
pub mod events {
    pub const ITEM_SAVED: &str = "item.saved";
    pub const ITEM_REMOVED: &str = "item.removed";
    pub const ITEM_VERDICT_RECORDED: &str = "item.verdict.recorded";
    pub const ITEM_REVISIT_RELEASED: &str = "item.revisit.released";
    pub const STREAK_EXTENDED: &str = "streak.extended";
    pub const STREAK_BROKEN: &str = "streak.broken";
    pub const PRIORITIES_RECALCULATED: &str = "priorities.recalculated";
}
