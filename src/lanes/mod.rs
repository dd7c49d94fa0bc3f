//! Three-lane "what's next" selection
//!
//! Each lane picks one queued item by its own rule:
//!
//! - **oldest**: earliest `saved_at`
//! - **mix up**: fewest tags shared with recently decided items
//! - **quick**: smallest `estimated_minutes`
//!
//! [`get_multi_queue_items`] runs the lanes in that order and excludes every
//! item already chosen from the later lanes, so one result never shows the
//! same item twice. With fewer than three queued items some lanes stay empty.
//!
//! All selectors filter to [`ItemStatus::Queued`](crate::ItemStatus::Queued)
//! themselves. Exact ties go to the item saved first, then the lowest id.

pub mod diversity;
pub mod filter;
pub mod oldest;
pub mod quick;

pub use diversity::{count_tag_overlap, mix_up_item};
pub use filter::{
    all_tags, backlog, filter_by_tag, filtered_queue, get_multi_queue_for_tag,
    recent_verdict_tags, FilteredQueue,
};
pub use oldest::oldest_item;
pub use quick::quick_item;

use crate::item::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Lane reasons shown next to each pick
pub mod reasons {
    pub const OLDEST: &str = "Oldest item in queue";
    pub const MIX_UP: &str = "Different from recent topics";
    /// Stands in for the minute count of an item without an estimate
    pub const UNKNOWN_MINUTES: &str = "?";
}

/// Lane a pick came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueueType {
    Oldest,
    MixUp,
    Quick,
}

/// One lane's pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    #[serde(rename = "type")]
    pub kind: QueueType,
    pub item: Item,
    pub reason: String,
}

impl QueueItem {
    fn oldest(item: &Item) -> Self {
        Self {
            kind: QueueType::Oldest,
            item: item.clone(),
            reason: reasons::OLDEST.to_string(),
        }
    }

    fn mix_up(item: &Item) -> Self {
        Self {
            kind: QueueType::MixUp,
            item: item.clone(),
            reason: reasons::MIX_UP.to_string(),
        }
    }

    fn quick(item: &Item) -> Self {
        let minutes = item
            .estimated_minutes
            .map(|m| m.to_string())
            .unwrap_or_else(|| reasons::UNKNOWN_MINUTES.to_string());
        Self {
            kind: QueueType::Quick,
            item: item.clone(),
            reason: format!("Only {} minutes", minutes),
        }
    }
}

/// Picks for all three lanes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiQueueResult {
    pub oldest: Option<QueueItem>,
    pub mix_up: Option<QueueItem>,
    pub quick: Option<QueueItem>,
    /// Queued items in the pool, before lane selection
    pub total_queued: usize,
}

impl MultiQueueResult {
    /// Non-empty lanes in lane order
    pub fn picks(&self) -> impl Iterator<Item = &QueueItem> {
        [&self.oldest, &self.mix_up, &self.quick]
            .into_iter()
            .flatten()
    }

    /// True when no lane produced a pick
    pub fn is_empty(&self) -> bool {
        self.picks().next().is_none()
    }
}

/// Fill the three lanes from `items` with sequential exclusion
pub fn get_multi_queue_items(items: &[Item], recent_verdict_tags: &[String]) -> MultiQueueResult {
    let queued: Vec<Item> = items.iter().filter(|i| i.is_queued()).cloned().collect();
    let mut exclude: Vec<ItemId> = Vec::with_capacity(2);

    let oldest = oldest_item(&queued, &exclude).map(QueueItem::oldest);
    if let Some(pick) = &oldest {
        exclude.push(pick.item.id.clone());
    }

    let mix_up = mix_up_item(&queued, recent_verdict_tags, &exclude).map(QueueItem::mix_up);
    if let Some(pick) = &mix_up {
        exclude.push(pick.item.id.clone());
    }

    let quick = quick_item(&queued, &exclude).map(QueueItem::quick);

    MultiQueueResult {
        oldest,
        mix_up,
        quick,
        total_queued: queued.len(),
    }
}

/// Queued items not in `exclude`
pub(crate) fn eligible<'a, 'b>(
    items: &'a [Item],
    exclude: &'b [ItemId],
) -> impl Iterator<Item = &'a Item> + 'b
where
    'a: 'b,
{
    items
        .iter()
        .filter(move |item| item.is_queued() && !exclude.contains(&item.id))
}

/// Shared tie-break: saved first wins, then lowest id
pub(crate) fn tie_break(a: &Item, b: &Item) -> Ordering {
    a.saved_at
        .cmp(&b.saved_at)
        .then_with(|| a.id.cmp(&b.id))
}
