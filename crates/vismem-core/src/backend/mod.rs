mod http;

pub use http::HttpBackend;

use crate::config::VismemConfig;
use crate::error::Result;
use crate::model::{Screenshot, SearchResult, UploadFile};

/// The remote visual-memory service, specified by the interface the
/// controller consumes. One implementation speaks HTTP; tests provide
/// an in-memory mock.
///
/// Every call carries the caller's bearer token; the backend itself
/// never fetches credentials.
pub trait RemoteBackend: Send + Sync {
    /// Fetch the authoritative screenshot list.
    fn list_screenshots(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Screenshot>>> + Send;

    /// Submit files as one multipart upload; the response carries one
    /// analyzed entry per file.
    fn upload_screenshots(
        &self,
        token: &str,
        files: Vec<UploadFile>,
    ) -> impl std::future::Future<Output = Result<Vec<Screenshot>>> + Send;

    /// Run a natural-language query for at most `max_results` candidates.
    fn search(
        &self,
        token: &str,
        text: &str,
        max_results: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>>> + Send;

    /// Delete one stored screenshot by filename.
    fn delete_screenshot(
        &self,
        token: &str,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Ask the service to backfill missing image data for previously
    /// stored screenshots. Returns the processed count.
    fn migrate_existing(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;
}

/// Shared handles delegate to the inner backend, so a controller can be
/// parameterized over `Arc<B>` when callers also hold a reference.
impl<B: RemoteBackend> RemoteBackend for std::sync::Arc<B> {
    fn list_screenshots(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Screenshot>>> + Send {
        (**self).list_screenshots(token)
    }

    fn upload_screenshots(
        &self,
        token: &str,
        files: Vec<UploadFile>,
    ) -> impl std::future::Future<Output = Result<Vec<Screenshot>>> + Send {
        (**self).upload_screenshots(token, files)
    }

    fn search(
        &self,
        token: &str,
        text: &str,
        max_results: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>>> + Send {
        (**self).search(token, text, max_results)
    }

    fn delete_screenshot(
        &self,
        token: &str,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        (**self).delete_screenshot(token, filename)
    }

    fn migrate_existing(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<u64>> + Send {
        (**self).migrate_existing(token)
    }
}

/// Build the HTTP backend described by configuration.
pub fn create_backend(config: &VismemConfig) -> Result<HttpBackend> {
    HttpBackend::new(&config.backend)
}
