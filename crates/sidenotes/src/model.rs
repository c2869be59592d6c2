//! # Domain Model
//!
//! [`Note`] is the only durable entity. Everything else in this module is a
//! view or a container around it:
//!
//! - [`NoteDraft`]: the optional fields a caller may supply on create.
//! - [`NoteUpdate`]: a field-level patch applied on update.
//! - [`BackupEnvelope`]: the export/import container.
//! - [`StorageInfo`]: usage accounting for display.
//! - [`Settings`]: the small persisted UI preference record.
//!
//! ## Serialized Form
//!
//! Notes are stored and exported as JSON objects with camelCase keys:
//!
//! ```text
//! { "id": "...", "title": "...", "content": "...", "tags": ["work"],
//!   "createdAt": "2025-01-15T10:00:00Z", "updatedAt": "...", "images": [] }
//! ```
//!
//! ## Lenient Re-read
//!
//! `id`, `title` and `content` are required. Everything else is defaulted when
//! absent, which lets older collections and hand-edited backups load:
//!
//! - `tags` → empty; otherwise normalized (see [`normalize_tags`])
//! - `createdAt` → now
//! - `updatedAt` → `createdAt`, and never earlier than it
//! - `images` → empty

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled Note";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<String>,
}

impl Note {
    /// Build a fresh note from a draft. The caller supplies the id so the
    /// store can guarantee uniqueness against its own collection.
    pub fn from_draft(id: String, draft: NoteDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: draft.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: draft.content.unwrap_or_default(),
            tags: normalize_tags(draft.tags.unwrap_or_default()),
            created_at: now,
            updated_at: now,
            images: draft.images.unwrap_or_default(),
        }
    }

    /// Apply a field-level patch. Omitted fields are untouched; `id` and
    /// `created_at` are not part of the patch and cannot change.
    pub fn apply(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        self.touch();
    }

    /// Refresh `updated_at`, keeping it at or after `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Re-apply the invariants that a lenient read cannot guarantee on its own.
    pub fn normalize(&mut self) {
        self.tags = normalize_tags(std::mem::take(&mut self.tags));
        if self.updated_at < self.created_at {
            self.updated_at = self.created_at;
        }
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = NoteHelper::deserialize(deserializer)?;
        let created_at = helper.created_at.unwrap_or_else(Utc::now);
        let updated_at = helper.updated_at.unwrap_or(created_at).max(created_at);

        Ok(Note {
            id: helper.id,
            title: helper.title,
            content: helper.content,
            tags: normalize_tags(helper.tags.unwrap_or_default()),
            created_at,
            updated_at,
            images: helper.images.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteHelper {
    id: String,
    title: String,
    content: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    images: Option<Vec<String>>,
}

/// Optional fields accepted by `create`. Anything omitted gets a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl NoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// A field-level patch. There is deliberately no `id` or `created_at` here;
/// unknown keys in a JSON patch (including those two) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl NoteUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.images.is_none()
    }

    /// Fold a later patch into this one; fields set in `later` win.
    pub fn merge(&mut self, later: NoteUpdate) {
        if later.title.is_some() {
            self.title = later.title;
        }
        if later.content.is_some() {
            self.content = later.content;
        }
        if later.tags.is_some() {
            self.tags = later.tags;
        }
        if later.images.is_some() {
            self.images = later.images;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEnvelope {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub note_count: usize,
    pub storage_size: u64,
    pub human_readable_size: String,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme '{other}' (expected light, dark or system)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub autosave_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            autosave_ms: 1000,
        }
    }
}

impl Settings {
    /// Quiescence window for debounced auto-save.
    pub fn autosave_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.autosave_ms)
    }
}

/// Generate a note id: a time-ordered UUID (millisecond timestamp plus random
/// bits) rendered as a simple hex string.
pub fn generate_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Trim, lowercase, drop empties and collapse duplicates, keeping the first
/// occurrence so display order survives.
pub fn normalize_tags<I, T>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
