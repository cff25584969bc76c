use vismem_core::controller::GallerySnapshot;
use vismem_core::search::SortKey;

/// Actions the UI sends to the async worker task.
#[derive(Debug)]
pub enum AsyncAction {
    /// Reload the gallery listing.
    Refresh,
    /// Run a remote search for the given query.
    Search { query: String },
    /// Delete a screenshot by filename.
    Delete { filename: String },
    /// Ask the server to backfill missing image data.
    Migrate,
    /// Update the client-side result filters.
    SetFilters {
        min_confidence: f32,
        sort_by: SortKey,
    },
    /// Drop the active query and its results.
    ClearSearch,
}

/// Results the async worker sends back to the UI. The worker owns the
/// gallery state; the UI only ever renders snapshots of it, so every
/// action answers with a fresh one. Errors travel inside the snapshot
/// as its notice.
#[derive(Debug)]
pub enum AsyncResult {
    State(Box<GallerySnapshot>),
}
