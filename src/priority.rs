//! Composite priority scoring for queued items
//!
//! Five factors, each normalized to `[0, 1]`, are combined with weights that
//! sum to 1.0:
//!
//! | Factor | Default weight | Meaning |
//! |--------|----------------|---------|
//! | age | 0.40 | older items rise, logarithmically |
//! | topic diversity | 0.20 | items sharing a tag with recent verdicts drop to 0.3 |
//! | source affinity | 0.15 | engagement with the item's source, 0.5 when unknown |
//! | estimated time | 0.10 | constant 1.0 until time-of-day matching exists |
//! | revisit penalty | 0.15 | each revisit costs 0.2, floored at 0 |
//!
//! The score is not used by the lane selectors. It is written to
//! [`Item::priority_score`] by [`recalculate_priorities`] for callers that
//! sort by it.

use crate::error::{Result, TrackerError};
use crate::item::{Item, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Topic diversity factor when an item shares a tag with recent verdicts
const RECENT_TOPIC_SCORE: f64 = 0.3;
/// Source affinity when nothing is known about the source
const NEUTRAL_AFFINITY: f64 = 0.5;
/// Revisit factor lost per revisit cycle
const REVISIT_STEP: f64 = 0.2;

/// Factor weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub age: f64,
    pub topic_diversity: f64,
    pub source_affinity: f64,
    pub estimated_time: f64,
    pub revisit_penalty: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            age: 0.40,
            topic_diversity: 0.20,
            source_affinity: 0.15,
            estimated_time: 0.10,
            revisit_penalty: 0.15,
        }
    }
}

impl PriorityWeights {
    pub fn total(&self) -> f64 {
        self.age
            + self.topic_diversity
            + self.source_affinity
            + self.estimated_time
            + self.revisit_penalty
    }

    /// Weights must be finite, non-negative and sum to 1.0
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.age,
            self.topic_diversity,
            self.source_affinity,
            self.estimated_time,
            self.revisit_penalty,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(TrackerError::ConfigError(
                "priority weights must be finite and non-negative".to_string(),
            ));
        }
        let total = self.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(TrackerError::ConfigError(format!(
                "priority weights must sum to 1.0, got {}",
                total
            )));
        }
        Ok(())
    }
}

/// Per-factor breakdown of an item's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityFactors {
    pub age: f64,
    pub topic_diversity: f64,
    pub source_affinity: f64,
    pub estimated_time: f64,
    pub revisit_penalty: f64,
}

impl PriorityFactors {
    /// Compute every factor for `item` as of `now`
    pub fn compute(
        item: &Item,
        recent_tags: &[String],
        source_engagement: &HashMap<String, f64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            age: age_score(item.saved_at, now),
            topic_diversity: topic_diversity_score(&item.tags, recent_tags),
            source_affinity: source_affinity_score(item.source_id.as_deref(), source_engagement),
            // TODO: match against the reader's available time once sessions record it
            estimated_time: 1.0,
            revisit_penalty: revisit_score(item.revisit_count),
        }
    }

    /// Weighted sum
    pub fn score(&self, weights: &PriorityWeights) -> f64 {
        self.age * weights.age
            + self.topic_diversity * weights.topic_diversity
            + self.source_affinity * weights.source_affinity
            + self.estimated_time * weights.estimated_time
            + self.revisit_penalty * weights.revisit_penalty
    }
}

/// Age score: `min(1, log10(days + 1) / 2)`
///
/// Roughly 0.15 after a day, 0.45 after a week, saturating at 1.0 after 99
/// days. Items saved "in the future" count as brand new.
pub fn age_score(saved_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = now.signed_duration_since(saved_at).num_days().max(0) as f64;
    ((days + 1.0).log10() / 2.0).min(1.0)
}

/// 1.0 unless the item shares at least one tag with `recent_tags`
pub fn topic_diversity_score(item_tags: &[String], recent_tags: &[String]) -> f64 {
    if recent_tags.is_empty() {
        return 1.0;
    }
    if item_tags.iter().any(|t| recent_tags.contains(t)) {
        RECENT_TOPIC_SCORE
    } else {
        1.0
    }
}

/// Known engagement for the source, clamped to `[0, 1]`, else neutral
pub fn source_affinity_score(
    source_id: Option<&str>,
    source_engagement: &HashMap<String, f64>,
) -> f64 {
    source_id
        .and_then(|id| source_engagement.get(id).copied())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL_AFFINITY)
}

/// `max(0, 1 - revisit_count * 0.2)`
pub fn revisit_score(revisit_count: u32) -> f64 {
    (1.0 - f64::from(revisit_count) * REVISIT_STEP).max(0.0)
}

/// Score an item as of now with the default weights
pub fn calculate_priority(
    item: &Item,
    recent_tags: &[String],
    source_engagement: &HashMap<String, f64>,
) -> f64 {
    calculate_priority_at(item, recent_tags, source_engagement, Utc::now())
}

/// Score an item as of `now` with the default weights
pub fn calculate_priority_at(
    item: &Item,
    recent_tags: &[String],
    source_engagement: &HashMap<String, f64>,
    now: DateTime<Utc>,
) -> f64 {
    calculate_priority_with(
        item,
        recent_tags,
        source_engagement,
        now,
        &PriorityWeights::default(),
    )
}

/// Score an item as of `now` with explicit weights
pub fn calculate_priority_with(
    item: &Item,
    recent_tags: &[String],
    source_engagement: &HashMap<String, f64>,
    now: DateTime<Utc>,
    weights: &PriorityWeights,
) -> f64 {
    PriorityFactors::compute(item, recent_tags, source_engagement, now).score(weights)
}

/// Rescore every queued item in place, returning how many were scored
pub fn recalculate_priorities(
    items: &mut [Item],
    recent_tags: &[String],
    source_engagement: &HashMap<String, f64>,
    now: DateTime<Utc>,
    weights: &PriorityWeights,
) -> usize {
    let mut scored = 0;
    for item in items.iter_mut().filter(|i| i.is_queued()) {
        item.priority_score =
            calculate_priority_with(item, recent_tags, source_engagement, now, weights);
        scored += 1;
    }
    scored
}

/// Tags of every item decided at or after `since`, flattened
pub fn recent_tags_since(items: &[Item], since: DateTime<Utc>) -> Vec<String> {
    items
        .iter()
        .filter(|i| i.verdict_at.is_some_and(|at| at >= since))
        .flat_map(|i| i.tags.iter().cloned())
        .collect()
}

/// Engagement per source from past verdicts
///
/// Keep counts 1.0, revisit 0.5, discard 0.0; the affinity is the mean over
/// all decided items from that source. Sources with no decided items are
/// absent (and score neutral).
pub fn source_engagement(items: &[Item]) -> HashMap<String, f64> {
    let mut totals: HashMap<&str, (f64, u32)> = HashMap::new();
    for item in items {
        let (Some(source), Some(verdict)) = (item.source_id.as_deref(), item.verdict) else {
            continue;
        };
        let value = match verdict {
            Verdict::Keep => 1.0,
            Verdict::Revisit => 0.5,
            Verdict::Discard => 0.0,
        };
        let entry = totals.entry(source).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(source, (sum, count))| (source.to_string(), sum / f64::from(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStatus;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 15, 12, 0, 0).unwrap()
    }

    fn base_item() -> Item {
        Item::new("1", now()).with_estimated_minutes(5)
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = PriorityWeights::default();
        assert!(approx(weights.total(), 1.0));
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = PriorityWeights {
            age: 0.5,
            ..PriorityWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(TrackerError::ConfigError(_))
        ));

        let weights = PriorityWeights {
            age: -0.1,
            topic_diversity: 0.7,
            ..PriorityWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_age_score_curve() {
        assert!(approx(age_score(now(), now()), 0.0));
        let one_day = age_score(now() - ChronoDuration::days(1), now());
        assert!((one_day - 0.1505).abs() < 1e-3);
        let week = age_score(now() - ChronoDuration::days(7), now());
        assert!((week - 0.4515).abs() < 1e-3);
        assert!(approx(age_score(now() - ChronoDuration::days(99), now()), 1.0));
        assert!(approx(age_score(now() - ChronoDuration::days(400), now()), 1.0));
    }

    #[test]
    fn test_age_score_partial_days_truncate() {
        let almost_a_day = now() - ChronoDuration::hours(23);
        assert!(approx(age_score(almost_a_day, now()), 0.0));
    }

    #[test]
    fn test_age_score_future_saved_at() {
        assert!(approx(age_score(now() + ChronoDuration::days(3), now()), 0.0));
    }

    #[test]
    fn test_fresh_item_score() {
        // 0.4*0 + 0.2*1 + 0.15*0.5 + 0.1*1 + 0.15*1
        let score = calculate_priority_at(&base_item(), &[], &HashMap::new(), now());
        assert!(approx(score, 0.525));
    }

    #[test]
    fn test_prioritizes_older_items() {
        let new_item = base_item();
        let old_item = Item::new("1", now() - ChronoDuration::days(30));

        let new_score = calculate_priority_at(&new_item, &[], &HashMap::new(), now());
        let old_score = calculate_priority_at(&old_item, &[], &HashMap::new(), now());
        assert!(old_score > new_score);
    }

    #[test]
    fn test_penalizes_revisited_items() {
        let fresh = base_item();
        let revisited = base_item().with_revisit_count(2);

        let fresh_score = calculate_priority_at(&fresh, &[], &HashMap::new(), now());
        let revisited_score = calculate_priority_at(&revisited, &[], &HashMap::new(), now());
        assert!(fresh_score > revisited_score);
    }

    #[test]
    fn test_revisit_score_floors_at_zero() {
        assert!(approx(revisit_score(0), 1.0));
        assert!(approx(revisit_score(1), 0.8));
        assert!(approx(revisit_score(5), 0.0));
        assert!(approx(revisit_score(12), 0.0));
    }

    #[test]
    fn test_penalizes_recent_topics() {
        let item = base_item().with_tags(["ai"]);

        let diverse = calculate_priority_at(&item, &[], &HashMap::new(), now());
        let repeated = calculate_priority_at(&item, &tags(&["ai"]), &HashMap::new(), now());
        assert!(diverse > repeated);
    }

    #[test]
    fn test_topic_penalty_is_binary() {
        let recent = tags(&["AI", "ML"]);
        assert!(approx(topic_diversity_score(&tags(&["AI"]), &recent), 0.3));
        assert!(approx(topic_diversity_score(&tags(&["AI", "ML"]), &recent), 0.3));
        assert!(approx(topic_diversity_score(&tags(&["DevOps"]), &recent), 1.0));
        assert!(approx(topic_diversity_score(&[], &recent), 1.0));
        assert!(approx(topic_diversity_score(&tags(&["AI"]), &[]), 1.0));
    }

    #[test]
    fn test_boosts_preferred_sources() {
        let item = base_item().with_source_id("source-1");
        let high = HashMap::from([("source-1".to_string(), 0.9)]);
        let low = HashMap::from([("source-1".to_string(), 0.1)]);

        let high_score = calculate_priority_at(&item, &[], &high, now());
        let low_score = calculate_priority_at(&item, &[], &low, now());
        assert!(high_score > low_score);
    }

    #[test]
    fn test_source_affinity_defaults() {
        let engagement = HashMap::from([("known".to_string(), 0.0), ("wild".to_string(), 3.0)]);
        assert!(approx(source_affinity_score(None, &engagement), 0.5));
        assert!(approx(source_affinity_score(Some("unknown"), &engagement), 0.5));
        assert!(approx(source_affinity_score(Some("known"), &engagement), 0.0));
        assert!(approx(source_affinity_score(Some("wild"), &engagement), 1.0));
    }

    #[test]
    fn test_score_monotonic_in_age_and_revisits() {
        let engagement = HashMap::new();
        let recent = tags(&["AI"]);
        let mut previous = f64::MIN;
        for days in [0, 1, 3, 7, 30, 90, 365] {
            let item = Item::new("1", now() - ChronoDuration::days(days)).with_tags(["AI"]);
            let score = calculate_priority_at(&item, &recent, &engagement, now());
            assert!(score >= previous);
            previous = score;
        }

        let mut previous = f64::MIN;
        for count in (0..8).rev() {
            let item = base_item().with_revisit_count(count);
            let score = calculate_priority_at(&item, &recent, &engagement, now());
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_factors_breakdown() {
        let item = Item::new("1", now() - ChronoDuration::days(99))
            .with_tags(["AI"])
            .with_source_id("s")
            .with_revisit_count(1);
        let engagement = HashMap::from([("s".to_string(), 1.0)]);
        let factors = PriorityFactors::compute(&item, &tags(&["AI"]), &engagement, now());
        assert!(approx(factors.age, 1.0));
        assert!(approx(factors.topic_diversity, 0.3));
        assert!(approx(factors.source_affinity, 1.0));
        assert!(approx(factors.estimated_time, 1.0));
        assert!(approx(factors.revisit_penalty, 0.8));
        // 0.4 + 0.06 + 0.15 + 0.1 + 0.12
        assert!(approx(factors.score(&PriorityWeights::default()), 0.83));
    }

    #[test]
    fn test_recalculate_only_queued() {
        let mut items = vec![
            Item::new("queued", now() - ChronoDuration::days(7)),
            Item::new("kept", now() - ChronoDuration::days(7)).with_status(ItemStatus::Kept),
        ];
        let scored = recalculate_priorities(
            &mut items,
            &[],
            &HashMap::new(),
            now(),
            &PriorityWeights::default(),
        );
        assert_eq!(scored, 1);
        assert!(items[0].priority_score > 0.0);
        assert!(approx(items[1].priority_score, 0.0));
    }

    #[test]
    fn test_recent_tags_since() {
        let items = vec![
            Item::new("a", now())
                .with_tags(["AI"])
                .with_verdict(Verdict::Keep, now() - ChronoDuration::days(2)),
            Item::new("b", now())
                .with_tags(["DevOps"])
                .with_verdict(Verdict::Discard, now() - ChronoDuration::days(10)),
            Item::new("c", now()).with_tags(["Security"]),
        ];
        let recent = recent_tags_since(&items, now() - ChronoDuration::days(7));
        assert_eq!(recent, tags(&["AI"]));
    }

    #[test]
    fn test_source_engagement_from_verdicts() {
        let at = now();
        let items = vec![
            Item::new("a", at).with_source_id("blog").with_verdict(Verdict::Keep, at),
            Item::new("b", at).with_source_id("blog").with_verdict(Verdict::Discard, at),
            Item::new("c", at).with_source_id("blog").with_verdict(Verdict::Revisit, at),
            Item::new("d", at).with_source_id("tube").with_verdict(Verdict::Keep, at),
            Item::new("e", at).with_source_id("quiet"),
            Item::new("f", at).with_verdict(Verdict::Keep, at),
        ];
        let engagement = source_engagement(&items);
        assert_eq!(engagement.len(), 2);
        assert!(approx(engagement["blog"], 0.5));
        assert!(approx(engagement["tube"], 1.0));
        assert!(!engagement.contains_key("quiet"));
    }
}
