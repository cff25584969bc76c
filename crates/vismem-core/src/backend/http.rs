use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::RemoteBackend;
use crate::config::BackendConfig;
use crate::error::{Result, VismemError};
use crate::model::{Screenshot, SearchResult, UploadFile};

/// Characters escaped when a filename travels as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// HTTP implementation of [`RemoteBackend`] against the visual-memory
/// service.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(remote_error(status.as_u16(), &body))
    }
}

/// Map a non-success response to [`VismemError::Remote`], preferring the
/// `detail` field of a structured error body over the raw text.
fn remote_error(status: u16, body: &str) -> VismemError {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: String,
    }

    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.detail,
        Err(_) if body.trim().is_empty() => "request failed".to_string(),
        Err(_) => body.trim().to_string(),
    };
    VismemError::Remote { status, detail }
}

fn encode_filename(filename: &str) -> String {
    utf8_percent_encode(filename, PATH_SEGMENT).to_string()
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    screenshots: Vec<Screenshot>,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    results: Vec<Screenshot>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    text: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct MigrateResponse {
    #[serde(default)]
    processed: u64,
}

impl RemoteBackend for HttpBackend {
    async fn list_screenshots(&self, token: &str) -> Result<Vec<Screenshot>> {
        let response = self
            .client
            .get(self.url("/visual-memory/screenshots"))
            .bearer_auth(token)
            .send()
            .await?;
        let body: ListResponse = Self::check(response).await?.json().await?;
        tracing::debug!(count = body.screenshots.len(), "screenshot list fetched");
        Ok(body.screenshots)
    }

    async fn upload_screenshots(
        &self,
        token: &str,
        files: Vec<UploadFile>,
    ) -> Result<Vec<Screenshot>> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(&file.content_type)?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.url("/visual-memory/upload-screenshots"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = Self::check(response).await?.json().await?;
        tracing::debug!(count = body.results.len(), "upload processed");
        Ok(body.results)
    }

    async fn search(
        &self,
        token: &str,
        text: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .post(self.url("/visual-memory/enhanced-search"))
            .bearer_auth(token)
            .json(&SearchRequest { text, max_results })
            .send()
            .await?;
        let body: SearchResponse = Self::check(response).await?.json().await?;
        tracing::debug!(count = body.results.len(), "search response received");
        Ok(body.results)
    }

    async fn delete_screenshot(&self, token: &str, filename: &str) -> Result<()> {
        let path = format!(
            "/visual-memory/screenshots/{}",
            encode_filename(filename)
        );
        let response = self
            .client
            .delete(self.url(&path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn migrate_existing(&self, token: &str) -> Result<u64> {
        let response = self
            .client
            .post(self.url("/visual-memory/migrate-existing-screenshots"))
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body: MigrateResponse = Self::check(response).await?.json().await?;
        Ok(body.processed)
    }
}
