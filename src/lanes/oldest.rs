//! Oldest lane: the item that has waited longest

use super::{eligible, tie_break};
use crate::item::{Item, ItemId};

/// Queued item with the earliest `saved_at`, ignoring `exclude`
pub fn oldest_item<'a>(items: &'a [Item], exclude: &[ItemId]) -> Option<&'a Item> {
    eligible(items, exclude).min_by(|a, b| tie_break(a, b))
}
