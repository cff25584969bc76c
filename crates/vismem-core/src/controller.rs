//! The gallery/search state controller: the canonical in-memory model
//! of screenshots, search results and previews, kept consistent across
//! upload, search, delete and migration against the remote backend.
//!
//! Every operation is one request/response cycle bracketed by its own
//! in-flight flag; flags are cleared on every path. Transport failures
//! leave prior state untouched and surface through the single
//! [`Notice`] slot. Validation failures (empty query, missing token)
//! never reach the network and never set a flag.

use std::collections::HashMap;

use crate::auth::TokenProvider;
use crate::backend::RemoteBackend;
use crate::error::{Result, VismemError};
use crate::model::{
    validate_query, LocalFile, Notice, OperationStatus, Screenshot, SearchResult, UploadFile,
    MAX_SEARCH_RESULTS,
};
use crate::placeholder::placeholder_data_uri;
use crate::preview::{local_data_uri, remote_data_uri, PreviewCache, PreviewSource};
use crate::search::{self, SearchFilters, SortKey};
use crate::suggest;

/// A search issued by [`GalleryController::begin_search`]. The sequence
/// tag lets a response be discarded once a newer search supersedes it.
#[derive(Debug)]
pub struct SearchRequest {
    pub seq: u64,
    pub text: String,
    pub token: String,
}

/// Render-relevant state, cloned out for message-passing view layers.
#[derive(Debug, Clone, Default)]
pub struct GallerySnapshot {
    pub screenshots: Vec<Screenshot>,
    pub results: Vec<SearchResult>,
    pub query: String,
    pub filters: SearchFilters,
    pub suggestions: Vec<String>,
    pub status: OperationStatus,
    pub notice: Option<Notice>,
    pub preview_sources: HashMap<String, PreviewSource>,
    pub local_sizes: HashMap<String, usize>,
}

pub struct GalleryController<B: RemoteBackend> {
    backend: B,
    tokens: Box<dyn TokenProvider>,

    screenshots: Vec<Screenshot>,
    results: Vec<SearchResult>,
    previews: PreviewCache,
    local_files: HashMap<String, LocalFile>,

    query: String,
    filters: SearchFilters,
    suggestions: Vec<String>,

    status: OperationStatus,
    notice: Option<Notice>,

    /// Bumped by every issued search; only the response carrying the
    /// current value is ever applied.
    search_seq: u64,
}

impl<B: RemoteBackend> GalleryController<B> {
    pub fn new(backend: B, tokens: Box<dyn TokenProvider>) -> Self {
        Self {
            backend,
            tokens,
            screenshots: Vec::new(),
            results: Vec::new(),
            previews: PreviewCache::new(),
            local_files: HashMap::new(),
            query: String::new(),
            filters: SearchFilters::default(),
            suggestions: Vec::new(),
            status: OperationStatus::default(),
            notice: None,
            search_seq: 0,
        }
    }

    // -- State accessors --

    pub fn screenshots(&self) -> &[Screenshot] {
        &self.screenshots
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn previews(&self) -> &PreviewCache {
        &self.previews
    }

    pub fn local_file(&self, filename: &str) -> Option<&LocalFile> {
        self.local_files.get(filename)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            screenshots: self.screenshots.clone(),
            results: self.results.clone(),
            query: self.query.clone(),
            filters: self.filters,
            suggestions: self.suggestions.clone(),
            status: self.status.clone(),
            notice: self.notice.clone(),
            preview_sources: self.previews.sources(),
            local_sizes: self
                .local_files
                .iter()
                .map(|(k, v)| (k.clone(), v.size))
                .collect(),
        }
    }

    fn require_token(&mut self) -> Result<String> {
        match self.tokens.token() {
            Some(token) => Ok(token),
            None => {
                let err = VismemError::MissingToken;
                self.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    // -- List loader --

    /// Fetch the authoritative list and replace the local one wholesale.
    /// Preview-cache gaps are filled from embedded image data when
    /// present, otherwise with a synthesized placeholder; existing
    /// entries are never overwritten with lower fidelity.
    pub async fn load_screenshots(&mut self) -> Result<()> {
        if self.status.loading {
            return Ok(());
        }
        let token = self.require_token()?;
        self.status.loading = true;
        tracing::debug!("loading screenshot list");

        let outcome = self.backend.list_screenshots(&token).await;
        self.status.loading = false;

        match outcome {
            Ok(list) => {
                for screenshot in &list {
                    self.merge_preview(screenshot);
                }
                tracing::info!(count = list.len(), "screenshot list replaced");
                self.screenshots = list;
                Ok(())
            }
            Err(err) => {
                self.notice = Some(Notice::error(format!("Failed to load screenshots: {err}")));
                Err(err)
            }
        }
    }

    fn merge_preview(&mut self, screenshot: &Screenshot) {
        if let Some(data) = &screenshot.image_data {
            self.previews.insert_image(
                &screenshot.filename,
                PreviewSource::Remote,
                remote_data_uri(data),
            );
        } else {
            self.previews.insert_placeholder(
                &screenshot.filename,
                placeholder_data_uri(&screenshot.filename),
            );
        }
    }

    // -- Upload handler --

    /// Upload a selection of files. Non-image files are silently
    /// skipped; each qualifying file gets an immediate local preview
    /// before the single multipart request goes out. On success, the
    /// analyzed entries are appended to the screenshot list.
    pub async fn upload(&mut self, files: Vec<UploadFile>) -> Result<Vec<Screenshot>> {
        if self.status.uploading {
            return Ok(Vec::new());
        }

        let skipped = files.iter().filter(|f| !f.is_image()).count();
        let qualifying: Vec<UploadFile> = files.into_iter().filter(UploadFile::is_image).collect();
        if skipped > 0 {
            tracing::debug!(skipped, "non-image files dropped from selection");
        }
        if qualifying.is_empty() {
            let err = VismemError::InvalidInput("no image files in the selection".into());
            self.notice = Some(Notice::error(err.to_string()));
            return Err(err);
        }

        let token = self.require_token()?;
        self.status.uploading = true;
        self.notice = None;

        for file in &qualifying {
            self.previews.insert_image(
                &file.name,
                PreviewSource::Local,
                local_data_uri(&file.content_type, &file.bytes),
            );
            self.local_files.insert(
                file.name.clone(),
                LocalFile {
                    content_type: file.content_type.clone(),
                    size: file.bytes.len(),
                },
            );
        }

        let outcome = self.backend.upload_screenshots(&token, qualifying).await;
        self.status.uploading = false;

        match outcome {
            Ok(results) => {
                self.notice = Some(Notice::info(format!(
                    "Successfully processed {} screenshots",
                    results.len()
                )));
                self.screenshots.extend(results.iter().cloned());
                Ok(results)
            }
            Err(err) => {
                self.notice = Some(Notice::error(format!("Upload failed: {err}")));
                Err(err)
            }
        }
    }

    // -- Search orchestrator --

    /// Validate the current query and open a sequence-tagged search.
    /// Clears prior results, sets the searching flag and bumps the
    /// sequence so any response still in flight goes stale.
    pub fn begin_search(&mut self) -> Result<SearchRequest> {
        let text = match validate_query(&self.query) {
            Ok(trimmed) => trimmed.to_string(),
            Err(err) => {
                self.notice = Some(Notice::error(err.to_string()));
                return Err(err);
            }
        };
        let token = self.require_token()?;

        self.search_seq += 1;
        self.status.searching = true;
        self.notice = None;
        self.results.clear();
        tracing::debug!(seq = self.search_seq, query = %text, "search issued");

        Ok(SearchRequest {
            seq: self.search_seq,
            text,
            token,
        })
    }

    /// Apply a search response. A stale sequence tag (a newer search
    /// was issued meanwhile) discards the response outright — the state
    /// it would describe has been superseded.
    pub fn apply_search_response(
        &mut self,
        seq: u64,
        outcome: Result<Vec<SearchResult>>,
    ) -> Result<()> {
        if seq != self.search_seq {
            tracing::debug!(seq, current = self.search_seq, "stale search response discarded");
            return Ok(());
        }
        self.status.searching = false;

        match outcome {
            Ok(raw) => {
                let processed = search::postprocess(raw, &self.filters);
                for result in &processed {
                    if let Some(data) = &result.screenshot.image_data {
                        self.previews.insert_image(
                            result.filename(),
                            PreviewSource::Remote,
                            remote_data_uri(data),
                        );
                    }
                }
                if processed.is_empty() {
                    self.notice = Some(Notice::info(
                        "No screenshots found matching your criteria. \
                         Try adjusting your search or filters.",
                    ));
                } else {
                    self.notice = None;
                }
                tracing::info!(seq, count = processed.len(), "search results applied");
                self.results = processed;
                Ok(())
            }
            Err(err) => {
                self.results.clear();
                self.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// One full search cycle against the backend, requesting the fixed
    /// candidate cap of [`MAX_SEARCH_RESULTS`].
    pub async fn search(&mut self) -> Result<()> {
        if self.status.searching {
            return Ok(());
        }
        let request = self.begin_search()?;
        let outcome = self
            .backend
            .search(&request.token, &request.text, MAX_SEARCH_RESULTS)
            .await;
        self.apply_search_response(request.seq, outcome)
    }

    // -- Delete handler --

    /// Delete one screenshot. The caller is responsible for interactive
    /// confirmation; the target is resolved by filename at apply time,
    /// never by a captured position. Deleting an entry that is already
    /// gone reports failure rather than silently succeeding.
    pub async fn delete(&mut self, filename: &str) -> Result<()> {
        if !self.screenshots.iter().any(|s| s.filename == filename) {
            let err = VismemError::NotFound(format!(
                "screenshot \"{filename}\" is not in the gallery"
            ));
            self.notice = Some(Notice::error(err.to_string()));
            return Err(err);
        }
        let token = self.require_token()?;
        self.status.deleting = Some(filename.to_string());
        tracing::debug!(filename, "deleting screenshot");

        let outcome = self.backend.delete_screenshot(&token, filename).await;
        self.status.deleting = None;

        match outcome {
            Ok(()) => {
                self.screenshots.retain(|s| s.filename != filename);
                self.previews.remove(filename);
                self.local_files.remove(filename);
                self.notice = Some(Notice::info(format!(
                    "Screenshot \"{filename}\" deleted successfully."
                )));
                Ok(())
            }
            Err(err) => {
                self.notice = Some(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    // -- Migration trigger --

    /// Ask the backend to backfill missing image data. A positive
    /// processed count triggers a full list reload to pick up the new
    /// bytes; zero is a no-op reported informationally.
    pub async fn migrate(&mut self) -> Result<u64> {
        if self.status.migrating {
            return Ok(0);
        }
        let token = self.require_token()?;
        self.status.migrating = true;

        let outcome = self.backend.migrate_existing(&token).await;
        let processed = match outcome {
            Ok(count) => count,
            Err(err) => {
                self.status.migrating = false;
                self.notice = Some(Notice::error(format!("Migration failed: {err}")));
                return Err(err);
            }
        };

        if processed > 0 {
            self.notice = Some(Notice::info(format!(
                "Migration completed! {processed} screenshots updated with real images."
            )));
            // Reload for the backfilled bytes; a failed reload surfaces
            // its own notice.
            let _ = self.load_screenshots().await;
        } else {
            self.notice = Some(Notice::info(
                "No screenshots needed migration. All screenshots already have image data.",
            ));
        }
        self.status.migrating = false;
        Ok(processed)
    }

    // -- Query / filter state --

    /// Record a query edit: recompute suggestions, clear a stale error
    /// once there is real input again, and drop the result set when the
    /// query empties.
    pub fn query_changed(&mut self, value: &str) {
        self.query = value.to_string();
        self.suggestions = suggest::suggestions_for(value);

        if value.trim().is_empty() {
            self.results.clear();
        } else if matches!(&self.notice, Some(n) if n.is_error()) {
            self.notice = None;
        }
    }

    /// Replace the query with a picked suggestion. The caller re-runs
    /// [`Self::search`] immediately after.
    pub fn apply_suggestion(&mut self, suggestion: &str) {
        self.query = suggestion.to_string();
        self.suggestions.clear();
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.results.clear();
        self.suggestions.clear();
        self.notice = None;
    }

    /// Affects only post-processing of subsequent responses.
    pub fn set_min_confidence(&mut self, value: f32) {
        self.filters.min_confidence = value.clamp(0.0, 1.0);
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.filters.sort_by = key;
    }
}
