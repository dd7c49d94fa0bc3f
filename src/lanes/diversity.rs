//! Mix-up lane: the item least like what was just decided

use super::{eligible, tie_break};
use crate::item::{Item, ItemId};
use std::collections::HashSet;

/// Number of `item_tags` present in `recent_tags`
pub fn count_tag_overlap(item_tags: &[String], recent_tags: &[String]) -> usize {
    overlap_with(item_tags, &tag_set(recent_tags))
}

fn tag_set(tags: &[String]) -> HashSet<&str> {
    tags.iter().map(String::as_str).collect()
}

fn overlap_with(item_tags: &[String], recent: &HashSet<&str>) -> usize {
    item_tags
        .iter()
        .filter(|tag| recent.contains(tag.as_str()))
        .count()
}

/// Queued item sharing the fewest tags with `recent_tags`, ignoring `exclude`
///
/// With no recent tags every item overlaps by zero, so this degrades to the
/// oldest remaining item.
pub fn mix_up_item<'a>(
    items: &'a [Item],
    recent_tags: &[String],
    exclude: &[ItemId],
) -> Option<&'a Item> {
    let recent = tag_set(recent_tags);
    eligible(items, exclude).min_by(|a, b| {
        overlap_with(&a.tags, &recent)
            .cmp(&overlap_with(&b.tags, &recent))
            .then_with(|| tie_break(a, b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStatus;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn tagged(id: &str, tags: &[&str]) -> Item {
        Item::new(id, ts(2024, 1, 1)).with_tags(tags.iter().copied())
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count_no_overlap() {
        assert_eq!(
            count_tag_overlap(&tags(&["AI", "ML"]), &tags(&["DevOps", "Security"])),
            0
        );
    }

    #[test]
    fn test_count_overlap() {
        assert_eq!(
            count_tag_overlap(
                &tags(&["AI", "ML", "Prompting"]),
                &tags(&["AI", "Prompting", "RAG"])
            ),
            2
        );
    }

    #[test]
    fn test_count_ignores_duplicate_recent_tags() {
        assert_eq!(count_tag_overlap(&tags(&["AI"]), &tags(&["AI", "AI", "AI"])), 1);
    }

    #[test]
    fn test_pick_has_minimal_overlap_count() {
        let items = vec![
            tagged("two", &["AI", "ML"]),
            tagged("one", &["AI", "Rust"]),
            tagged("one-b", &["ML", "Go"]),
        ];
        let recent = tags(&["AI", "ML", "AI"]);
        let pick = mix_up_item(&items, &recent, &[]).unwrap();
        let min = items
            .iter()
            .map(|i| count_tag_overlap(&i.tags, &recent))
            .min()
            .unwrap();
        assert_eq!(count_tag_overlap(&pick.tags, &recent), min);
        assert_eq!(pick.id, "one");
    }

    #[test]
    fn test_empty_pool() {
        assert!(mix_up_item(&[], &[], &[]).is_none());
    }

    #[test]
    fn test_returns_least_overlap() {
        let items = vec![
            tagged("ai-item", &["AI", "ML"]),
            tagged("devops-item", &["DevOps", "K8s"]),
            tagged("mixed", &["AI", "DevOps"]),
        ];
        let recent = tags(&["AI", "ML", "Prompting"]);
        assert_eq!(mix_up_item(&items, &recent, &[]).unwrap().id, "devops-item");
    }

    #[test]
    fn test_excludes_ids() {
        let items = vec![tagged("devops-item", &["DevOps"]), tagged("ai-item", &["AI"])];
        let result = mix_up_item(&items, &tags(&["AI"]), &["devops-item".to_string()]);
        assert_eq!(result.unwrap().id, "ai-item");
    }

    #[test]
    fn test_only_considers_queued() {
        let items = vec![
            tagged("fresh-but-kept", &["Rare"]).with_status(ItemStatus::Kept),
            tagged("queued", &["AI"]),
        ];
        assert_eq!(mix_up_item(&items, &tags(&["AI"]), &[]).unwrap().id, "queued");
    }

    #[test]
    fn test_no_recent_tags_picks_oldest() {
        let items = vec![
            Item::new("newer", ts(2024, 6, 1)).with_tags(["AI"]),
            Item::new("older", ts(2024, 1, 1)).with_tags(["DevOps"]),
        ];
        assert_eq!(mix_up_item(&items, &[], &[]).unwrap().id, "older");
    }

    #[test]
    fn test_untagged_items_have_zero_overlap() {
        let items = vec![
            Item::new("tagged", ts(2024, 1, 1)).with_tags(["AI"]),
            Item::new("untagged", ts(2024, 6, 1)),
        ];
        assert_eq!(mix_up_item(&items, &tags(&["AI"]), &[]).unwrap().id, "untagged");
    }
}
