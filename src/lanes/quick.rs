//! Quick lane: the shortest read

use super::{eligible, tie_break};
use crate::item::{Item, ItemId};
use std::cmp::Ordering;

/// Sort key for reading time; unknown durations sort after every known one
fn minutes_key(item: &Item) -> u64 {
    item.estimated_minutes.map_or(u64::MAX, u64::from)
}

/// Queued item with the smallest `estimated_minutes`, ignoring `exclude`
///
/// Items without an estimate only win when no remaining item has one.
pub fn quick_item<'a>(items: &'a [Item], exclude: &[ItemId]) -> Option<&'a Item> {
    eligible(items, exclude).min_by(|a, b| compare_quickness(a, b))
}

fn compare_quickness(a: &Item, b: &Item) -> Ordering {
    minutes_key(a)
        .cmp(&minutes_key(b))
        .then_with(|| tie_break(a, b))
}
