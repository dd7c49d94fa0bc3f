//! Saved items and their lifecycle state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Item identifier
pub type ItemId = String;

/// Lifecycle state of an item (mutually exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Queued,
    Kept,
    Revisit,
    Discarded,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Queued => "queued",
            ItemStatus::Kept => "kept",
            ItemStatus::Revisit => "revisit",
            ItemStatus::Discarded => "discarded",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision recorded when the user finishes reviewing an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Keep,
    Revisit,
    Discard,
}

impl Verdict {
    /// Status an item moves to once this verdict is recorded
    pub fn resulting_status(&self) -> ItemStatus {
        match self {
            Verdict::Keep => ItemStatus::Kept,
            Verdict::Revisit => ItemStatus::Revisit,
            Verdict::Discard => ItemStatus::Discarded,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Keep => "keep",
            Verdict::Revisit => "revisit",
            Verdict::Discard => "discard",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the item's content came from
///
/// Opaque to the queue core; only the item repository and the presentation
/// layer look inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceData {
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    Document {
        #[serde(rename = "fileId")]
        file_id: String,
        #[serde(rename = "fileName")]
        file_name: String,
        #[serde(rename = "extractedText")]
        extracted_text: String,
    },
}

impl SourceData {
    pub fn link(url: impl Into<String>) -> Self {
        SourceData::Link {
            url: url.into(),
            content: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        SourceData::Text {
            content: content.into(),
            attribution: None,
        }
    }

    /// Short discriminator matching the serialized `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            SourceData::Link { .. } => "link",
            SourceData::Text { .. } => "text",
            SourceData::Document { .. } => "document",
        }
    }
}

/// A saved item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_data: SourceData,
    pub status: ItemStatus,
    pub saved_at: DateTime<Utc>,
    /// Unknown duration is `None`
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub revisit_count: u32,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub user_note: Option<String>,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub takeaway: Option<String>,
    #[serde(default)]
    pub takeaway_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verdict: Option<Verdict>,
    #[serde(default)]
    pub verdict_at: Option<DateTime<Utc>>,
    /// Earliest time a revisited item may return to the queue
    #[serde(default)]
    pub revisit_after: Option<DateTime<Utc>>,
    /// Last score written by the batch priority job
    #[serde(default)]
    pub priority_score: f64,
}

impl Item {
    /// Create a queued link-less text item with the given id and save time
    pub fn new(id: impl Into<String>, saved_at: DateTime<Utc>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            description: None,
            source_data: SourceData::text(""),
            status: ItemStatus::Queued,
            saved_at,
            estimated_minutes: None,
            tags: Vec::new(),
            revisit_count: 0,
            source_id: None,
            user_note: None,
            read_at: None,
            takeaway: None,
            takeaway_at: None,
            verdict: None,
            verdict_at: None,
            revisit_after: None,
            priority_score: 0.0,
        }
    }

    /// Set title (builder pattern)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set status (builder pattern)
    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    /// Set estimated reading time (builder pattern)
    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    /// Set tags (builder pattern)
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Set originating source (builder pattern)
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Set revisit counter (builder pattern)
    pub fn with_revisit_count(mut self, count: u32) -> Self {
        self.revisit_count = count;
        self
    }

    /// Set source data (builder pattern)
    pub fn with_source_data(mut self, source_data: SourceData) -> Self {
        self.source_data = source_data;
        self
    }

    /// Mark as decided at the given time (builder pattern)
    pub fn with_verdict(mut self, verdict: Verdict, at: DateTime<Utc>) -> Self {
        self.status = verdict.resulting_status();
        self.verdict = Some(verdict);
        self.verdict_at = Some(at);
        self
    }

    /// Eligible for queue selection
    pub fn is_queued(&self) -> bool {
        self.status == ItemStatus::Queued
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Payload for saving a new item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub source_data: SourceData,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub user_note: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
}

impl NewItem {
    pub fn new(title: impl Into<String>, source_data: SourceData) -> Self {
        Self {
            title: title.into(),
            source_data,
            description: None,
            estimated_minutes: None,
            tags: Vec::new(),
            user_note: None,
            source_id: None,
        }
    }

    /// Set estimated reading time (builder pattern)
    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    /// Set tags (builder pattern)
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set originating source (builder pattern)
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Materialize a queued item with a fresh id
    pub fn into_item(self, saved_at: DateTime<Utc>) -> Item {
        Item {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            description: self.description,
            source_data: self.source_data,
            status: ItemStatus::Queued,
            saved_at,
            estimated_minutes: self.estimated_minutes,
            tags: normalize_tags(self.tags),
            revisit_count: 0,
            source_id: self.source_id,
            user_note: self.user_note,
            read_at: None,
            takeaway: None,
            takeaway_at: None,
            verdict: None,
            verdict_at: None,
            revisit_after: None,
            priority_score: 0.0,
        }
    }
}

/// Trim, drop empties and deduplicate while keeping first-seen order
fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag: String = tag.into();
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
