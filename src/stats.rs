//! Per-user verdict counters and streak

use crate::item::Verdict;
use crate::streak::{update_streak_in, Streak};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate stats (one per user)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub streak: Streak,
    #[serde(default)]
    pub total_kept: u64,
    #[serde(default)]
    pub total_discarded: u64,
    #[serde(default)]
    pub total_revisited: u64,
    #[serde(default)]
    pub weekly_kept: u64,
    #[serde(default)]
    pub weekly_discarded: u64,
}

impl UserStats {
    /// Total verdicts ever recorded
    pub fn total_decided(&self) -> u64 {
        self.total_kept + self.total_discarded + self.total_revisited
    }

    /// Fraction of keep-or-discard decisions that were keeps, if any
    pub fn keep_rate(&self) -> Option<f64> {
        let decided = self.total_kept + self.total_discarded;
        (decided > 0).then(|| self.total_kept as f64 / decided as f64)
    }
}

/// Apply a verdict recorded at `at` to the stats, with day boundaries in `tz`
pub fn record_verdict_stats<Tz: TimeZone>(
    stats: UserStats,
    verdict: Verdict,
    at: DateTime<Utc>,
    tz: &Tz,
) -> UserStats {
    let mut next = UserStats {
        streak: update_streak_in(stats.streak, at, tz),
        ..stats
    };
    match verdict {
        Verdict::Keep => {
            next.total_kept += 1;
            next.weekly_kept += 1;
        }
        Verdict::Discard => {
            next.total_discarded += 1;
            next.weekly_discarded += 1;
        }
        Verdict::Revisit => {
            next.total_revisited += 1;
        }
    }
    next
}

/// Zero the weekly counters, leaving totals and streak intact
pub fn reset_weekly(stats: UserStats) -> UserStats {
    UserStats {
        weekly_kept: 0,
        weekly_discarded: 0,
        ..stats
    }
}
