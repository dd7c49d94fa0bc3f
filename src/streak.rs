//! Day-based engagement streaks
//!
//! A streak counts consecutive calendar days on which at least one verdict
//! was recorded. Days are compared in a caller-chosen time zone (the local
//! zone by default); only whole-day differences matter, never elapsed hours.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Streak aggregate (one per user)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive days with at least one verdict
    pub current: u32,
    /// High-water mark of `current`
    pub longest: u32,
    /// Timestamp of the last recorded verdict
    pub last_verdict_date: Option<DateTime<Utc>>,
}

impl Streak {
    pub fn new(current: u32, longest: u32, last_verdict_date: Option<DateTime<Utc>>) -> Self {
        Self {
            current,
            longest,
            last_verdict_date,
        }
    }
}

/// Update a streak for a verdict recorded at `verdict_at`, using local time
/// for day boundaries.
pub fn update_streak(streak: Streak, verdict_at: DateTime<Utc>) -> Streak {
    update_streak_in(streak, verdict_at, &Local)
}

/// Update a streak for a verdict recorded at `verdict_at`, using `tz` for day
/// boundaries.
///
/// - first verdict ever: `current = 1`
/// - same day: counts unchanged, timestamp refreshed
/// - next day: `current + 1`, `longest` follows if beaten
/// - later day: `current = 1`, `longest` preserved
/// - earlier day than the last verdict: ignored, prior state returned as-is
pub fn update_streak_in<Tz: TimeZone>(
    streak: Streak,
    verdict_at: DateTime<Utc>,
    tz: &Tz,
) -> Streak {
    let Some(last) = streak.last_verdict_date else {
        return Streak {
            current: 1,
            longest: streak.longest.max(1),
            last_verdict_date: Some(verdict_at),
        };
    };

    let days = day_difference(calendar_day(verdict_at, tz), calendar_day(last, tz));

    match days {
        d if d < 0 => streak,
        0 => Streak {
            current: streak.current,
            longest: streak.longest.max(streak.current),
            last_verdict_date: Some(verdict_at),
        },
        1 => {
            let current = streak.current.saturating_add(1);
            Streak {
                current,
                longest: streak.longest.max(current),
                last_verdict_date: Some(verdict_at),
            }
        }
        _ => Streak {
            current: 1,
            longest: streak.longest.max(1),
            last_verdict_date: Some(verdict_at),
        },
    }
}

fn calendar_day<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

fn day_difference(later: NaiveDate, earlier: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}
