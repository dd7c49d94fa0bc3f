//! Tracker configuration types

use crate::error::{Result, TrackerError};
use crate::priority::PriorityWeights;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerConfig {
    /// How many recently decided items feed the mix-up lane
    #[serde(default = "default_recent_verdict_limit")]
    pub recent_verdict_limit: usize,
    /// How long a revisited item stays out of the queue
    #[serde(default = "default_revisit_delay", with = "duration_serde")]
    pub revisit_delay: Duration,
    /// Look-back window for topic diversity when rescoring priorities
    #[serde(default = "default_recent_tag_window", with = "duration_serde")]
    pub recent_tag_window: Duration,
    /// Items previewed after the current one in a tag-filtered queue
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
    /// Priority factor weights
    #[serde(default)]
    pub priority_weights: PriorityWeights,
}

fn default_recent_verdict_limit() -> usize {
    3
}

fn default_revisit_delay() -> Duration {
    DAY * 7
}

fn default_recent_tag_window() -> Duration {
    DAY * 7
}

fn default_upcoming_limit() -> usize {
    3
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            recent_verdict_limit: default_recent_verdict_limit(),
            revisit_delay: default_revisit_delay(),
            recent_tag_window: default_recent_tag_window(),
            upcoming_limit: default_upcoming_limit(),
            priority_weights: PriorityWeights::default(),
        }
    }
}

impl TrackerConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set recent verdict limit (builder pattern)
    pub fn with_recent_verdict_limit(mut self, limit: usize) -> Self {
        self.recent_verdict_limit = limit;
        self
    }

    /// Set revisit delay (builder pattern)
    pub fn with_revisit_delay(mut self, delay: Duration) -> Self {
        self.revisit_delay = delay;
        self
    }

    /// Set recent tag window (builder pattern)
    pub fn with_recent_tag_window(mut self, window: Duration) -> Self {
        self.recent_tag_window = window;
        self
    }

    /// Set upcoming preview length (builder pattern)
    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = limit;
        self
    }

    /// Set priority weights (builder pattern)
    pub fn with_priority_weights(mut self, weights: PriorityWeights) -> Self {
        self.priority_weights = weights;
        self
    }

    /// Check that the configuration can drive a tracker
    pub fn validate(&self) -> Result<()> {
        if chrono::Duration::from_std(self.revisit_delay).is_err() {
            return Err(TrackerError::ConfigError(
                "revisit delay is too large".to_string(),
            ));
        }
        if chrono::Duration::from_std(self.recent_tag_window).is_err() {
            return Err(TrackerError::ConfigError(
                "recent tag window is too large".to_string(),
            ));
        }
        self.priority_weights.validate()
    }
}
