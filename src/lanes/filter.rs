//! Tag-filtered views over the queue

use super::{get_multi_queue_items, tie_break, MultiQueueResult};
use crate::item::{Item, ItemStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Items carrying `tag`
pub fn filter_by_tag(items: &[Item], tag: &str) -> Vec<Item> {
    items.iter().filter(|i| i.has_tag(tag)).cloned().collect()
}

/// Lane picks restricted to items tagged `tag` (all items when `None`)
pub fn get_multi_queue_for_tag(
    items: &[Item],
    recent_verdict_tags: &[String],
    tag: Option<&str>,
) -> MultiQueueResult {
    match tag {
        Some(tag) => get_multi_queue_items(&filter_by_tag(items, tag), recent_verdict_tags),
        None => get_multi_queue_items(items, recent_verdict_tags),
    }
}

/// Single-topic reading order: the next item and a short preview of what follows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredQueue {
    pub current: Option<Item>,
    pub upcoming: Vec<Item>,
    /// All queued items, regardless of tag
    pub total: usize,
    /// Queued items carrying the tag
    pub filtered_count: usize,
}

/// Queued items tagged `tag`, oldest first, split into current and up to
/// `upcoming_limit` upcoming items
pub fn filtered_queue(items: &[Item], tag: &str, upcoming_limit: usize) -> FilteredQueue {
    let queued: Vec<&Item> = items.iter().filter(|i| i.is_queued()).collect();
    let mut matching: Vec<&Item> = queued.iter().copied().filter(|i| i.has_tag(tag)).collect();
    matching.sort_by(|a, b| tie_break(a, b));

    let mut ordered = matching.iter().map(|i| (*i).clone());
    let current = ordered.next();
    let upcoming = ordered.take(upcoming_limit).collect();

    FilteredQueue {
        current,
        upcoming,
        total: queued.len(),
        filtered_count: matching.len(),
    }
}

/// Kept items, most recently decided first
pub fn backlog(items: &[Item]) -> Vec<Item> {
    let mut kept: Vec<&Item> = items
        .iter()
        .filter(|i| i.status == ItemStatus::Kept)
        .collect();
    kept.sort_by(|a, b| b.verdict_at.cmp(&a.verdict_at).then_with(|| a.id.cmp(&b.id)));
    kept.into_iter().cloned().collect()
}

/// Distinct tag names across all items, sorted
pub fn all_tags(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|i| i.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Tags of the `limit` most recently decided items, most recent first
///
/// Feeds the mix-up lane. Tags repeat when several recent items share them.
pub fn recent_verdict_tags(items: &[Item], limit: usize) -> Vec<String> {
    let mut decided: Vec<&Item> = items.iter().filter(|i| i.verdict.is_some()).collect();
    decided.sort_by(|a, b| b.verdict_at.cmp(&a.verdict_at).then_with(|| a.id.cmp(&b.id)));
    decided
        .into_iter()
        .take(limit)
        .flat_map(|i| i.tags.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Verdict;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn tagged(id: &str, saved: DateTime<Utc>, tags: &[&str]) -> Item {
        Item::new(id, saved).with_tags(tags.iter().copied())
    }

    #[test]
    fn test_filter_by_tag() {
        let items = vec![
            tagged("a", ts(2024, 1, 1), &["AI"]),
            tagged("b", ts(2024, 1, 2), &["DevOps"]),
            tagged("c", ts(2024, 1, 3), &["AI", "DevOps"]),
        ];
        let ids: Vec<String> = filter_by_tag(&items, "AI").into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(filter_by_tag(&items, "Nope").is_empty());
    }

    #[test]
    fn test_multi_queue_for_tag() {
        let items = vec![
            tagged("ai-old", ts(2024, 1, 1), &["AI"]),
            tagged("devops", ts(2023, 1, 1), &["DevOps"]),
            tagged("ai-new", ts(2024, 6, 1), &["AI"]),
        ];
        let result = get_multi_queue_for_tag(&items, &[], Some("AI"));
        assert_eq!(result.total_queued, 2);
        assert_eq!(result.oldest.unwrap().item.id, "ai-old");

        let result = get_multi_queue_for_tag(&items, &[], None);
        assert_eq!(result.total_queued, 3);
        assert_eq!(result.oldest.unwrap().item.id, "devops");
    }

    #[test]
    fn test_filtered_queue_orders_oldest_first() {
        let items = vec![
            tagged("d", ts(2024, 4, 1), &["AI"]),
            tagged("a", ts(2024, 1, 1), &["AI"]),
            tagged("x", ts(2023, 1, 1), &["DevOps"]),
            tagged("c", ts(2024, 3, 1), &["AI"]),
            tagged("b", ts(2024, 2, 1), &["AI"]),
            tagged("e", ts(2024, 5, 1), &["AI"]),
            tagged("kept", ts(2022, 1, 1), &["AI"]).with_status(ItemStatus::Kept),
        ];
        let view = filtered_queue(&items, "AI", 3);
        assert_eq!(view.current.unwrap().id, "a");
        let upcoming: Vec<&str> = view.upcoming.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(upcoming, vec!["b", "c", "d"]);
        assert_eq!(view.total, 6);
        assert_eq!(view.filtered_count, 5);
    }

    #[test]
    fn test_filtered_queue_no_matches() {
        let items = vec![tagged("a", ts(2024, 1, 1), &["AI"])];
        let view = filtered_queue(&items, "DevOps", 3);
        assert!(view.current.is_none());
        assert!(view.upcoming.is_empty());
        assert_eq!(view.total, 1);
        assert_eq!(view.filtered_count, 0);
    }

    #[test]
    fn test_backlog_newest_verdict_first() {
        let items = vec![
            tagged("early", ts(2024, 1, 1), &["AI"]).with_verdict(Verdict::Keep, ts(2024, 2, 1)),
            tagged("late", ts(2024, 1, 2), &["AI"]).with_verdict(Verdict::Keep, ts(2024, 3, 1)),
            tagged("dropped", ts(2024, 1, 3), &["AI"]).with_verdict(Verdict::Discard, ts(2024, 4, 1)),
            tagged("later", ts(2024, 1, 4), &["AI"]).with_verdict(Verdict::Revisit, ts(2024, 4, 1)),
            tagged("queued", ts(2024, 1, 5), &["AI"]),
        ];
        let ids: Vec<String> = backlog(&items).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["late", "early"]);
        assert!(backlog(&[]).is_empty());
    }

    #[test]
    fn test_all_tags_distinct_and_sorted() {
        let items = vec![
            tagged("a", ts(2024, 1, 1), &["Rust", "AI"]),
            tagged("b", ts(2024, 1, 2), &["DevOps", "AI"]),
            tagged("c", ts(2024, 1, 3), &[]).with_verdict(Verdict::Keep, ts(2024, 2, 1)),
            tagged("d", ts(2024, 1, 4), &["Rust"]).with_status(ItemStatus::Discarded),
        ];
        assert_eq!(all_tags(&items), vec!["AI", "DevOps", "Rust"]);
        assert!(all_tags(&[]).is_empty());
    }

    #[test]
    fn test_recent_verdict_tags_takes_latest() {
        let items = vec![
            tagged("old", ts(2024, 1, 1), &["History"]).with_verdict(Verdict::Keep, ts(2024, 2, 1)),
            tagged("mid", ts(2024, 1, 1), &["AI", "ML"]).with_verdict(Verdict::Discard, ts(2024, 3, 1)),
            tagged("new", ts(2024, 1, 1), &["AI"]).with_verdict(Verdict::Revisit, ts(2024, 4, 1)),
            tagged("newest", ts(2024, 1, 1), &["DevOps"]).with_verdict(Verdict::Keep, ts(2024, 5, 1)),
            tagged("undecided", ts(2024, 1, 1), &["Security"]),
        ];
        let recent = recent_verdict_tags(&items, 3);
        assert_eq!(recent, vec!["DevOps", "AI", "AI", "ML"]);
    }

    #[test]
    fn test_recent_verdict_tags_empty() {
        let items = vec![tagged("a", ts(2024, 1, 1), &["AI"])];
        assert!(recent_verdict_tags(&items, 3).is_empty());
        assert!(recent_verdict_tags(&[], 3).is_empty());
    }
}
