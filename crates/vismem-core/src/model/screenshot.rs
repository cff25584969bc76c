use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VismemError};

/// The backend always scores at most this many candidates per query.
/// The client trusts the cap rather than re-truncating.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// One stored image known to the backend.
///
/// Created by a successful upload response or the initial list load,
/// removed by a successful delete; never mutated in place except by a
/// wholesale list replacement on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    /// Unique key within the user's collection.
    pub filename: String,
    pub upload_time: DateTime<Utc>,
    /// Text extracted by the backend's image analysis, when available.
    #[serde(default)]
    pub text_content: Option<String>,
    /// Base64-encoded image bytes, present only when the backend chose
    /// to embed them inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

/// One scored match for a search query. A superset of [`Screenshot`];
/// fully replaced on every new search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub screenshot: Screenshot,
    /// Backend-assigned relevance in `[0, 1]`.
    pub confidence_score: f32,
    #[serde(default)]
    pub visual_description: String,
}

impl SearchResult {
    pub fn filename(&self) -> &str {
        &self.screenshot.filename
    }
}

/// A user-selected file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Only image content types qualify for upload; anything else in a
    /// selection is silently skipped.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Metadata retained for files uploaded during this session, for later
/// size/display use. Forgotten when the screenshot is deleted.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub content_type: String,
    pub size: usize,
}

/// Independent in-flight flags. Each guards duplicate invocation of its
/// own operation type only; different operation types may overlap.
#[derive(Debug, Clone, Default)]
pub struct OperationStatus {
    pub loading: bool,
    pub uploading: bool,
    pub searching: bool,
    pub migrating: bool,
    /// Filename-scoped: at most one deletion indicator at a time.
    pub deleting: Option<String>,
}

impl OperationStatus {
    pub fn any_in_flight(&self) -> bool {
        self.loading
            || self.uploading
            || self.searching
            || self.migrating
            || self.deleting.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational outcome (e.g. an empty search) — not a failure.
    Info,
    Error,
}

/// The single user-visible message slot owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Validate a search query: empty or whitespace-only input fails fast
/// locally, before any network call.
pub fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(VismemError::InvalidInput(
            "Please enter a search query".into(),
        ));
    }
    Ok(trimmed)
}
