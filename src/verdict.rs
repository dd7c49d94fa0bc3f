//! Read → reflect → decide transitions for a single item

use crate::error::{Result, TrackerError};
use crate::item::{Item, ItemId, ItemStatus, Verdict};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

fn require_queued(item: &Item, action: &str) -> Result<()> {
    if item.is_queued() {
        Ok(())
    } else {
        Err(TrackerError::InvalidTransition {
            id: item.id.clone(),
            reason: format!("cannot {} an item that is {}", action, item.status),
        })
    }
}

/// Record that the item was opened and read
///
/// The first read time is kept when an item is read again.
pub fn mark_read(item: &mut Item, at: DateTime<Utc>) -> Result<()> {
    require_queued(item, "read")?;
    item.read_at.get_or_insert(at);
    Ok(())
}

/// Store the reader's takeaway; an empty takeaway is allowed
pub fn save_takeaway(item: &mut Item, takeaway: impl Into<String>, at: DateTime<Utc>) -> Result<()> {
    require_queued(item, "reflect on")?;
    item.takeaway = Some(takeaway.into());
    item.takeaway_at = Some(at);
    Ok(())
}

/// Decide a queued item
///
/// A revisit increments `revisit_count` and holds the item back until
/// `at + revisit_delay`.
pub fn apply_verdict(
    item: &mut Item,
    verdict: Verdict,
    at: DateTime<Utc>,
    revisit_delay: Duration,
) -> Result<()> {
    require_queued(item, "decide")?;
    let delay = ChronoDuration::from_std(revisit_delay)
        .map_err(|e| TrackerError::ConfigError(format!("revisit delay out of range: {}", e)))?;

    item.verdict = Some(verdict);
    item.verdict_at = Some(at);
    item.status = verdict.resulting_status();

    if verdict == Verdict::Revisit {
        item.revisit_count = item.revisit_count.saturating_add(1);
        item.revisit_after = Some(at + delay);
    }

    Ok(())
}

/// Return due revisits to the queue, returning the released ids
///
/// Read and takeaway state is cleared so the item goes through the whole flow
/// again. The previous verdict stays until the next one replaces it.
pub fn release_due_revisits(items: &mut [Item], now: DateTime<Utc>) -> Vec<ItemId> {
    let mut released = Vec::new();
    for item in items.iter_mut() {
        if item.status != ItemStatus::Revisit {
            continue;
        }
        if item.revisit_after.is_some_and(|after| after > now) {
            continue;
        }
        item.status = ItemStatus::Queued;
        item.revisit_after = None;
        item.read_at = None;
        item.takeaway = None;
        item.takeaway_at = None;
        released.push(item.id.clone());
    }
    released
}
