use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use adwatch_core::{AdRecord, Catalog, CrawlOutcome, ResultsSnapshot};

use crate::pipeline::{RequestPipeline, RetryPolicy};
use crate::{ApiError, ErrorKind};

/// The backend seam. The app talks to the monitor backend through this trait
/// so tests can substitute fakes for the HTTP client.
#[async_trait]
pub trait MonitorBackend: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, ApiError>;
    /// Full-overwrite save of the entire catalog; there are no partial updates.
    async fn save_catalog(&self, catalog: &Catalog) -> Result<(), ApiError>;
    async fn fetch_results(&self) -> Result<ResultsSnapshot, ApiError>;
    async fn start_crawl(&self, keywords: &[String]) -> Result<CrawlOutcome, ApiError>;
    async fn delete_record(&self, landing_page: &str) -> Result<(), ApiError>;
    async fn expand_keywords(&self, category: &str) -> Result<Vec<String>, ApiError>;
}

/// JSON/HTTP client for the monitor backend.
pub struct MonitorApi {
    pipeline: RequestPipeline,
    base_url: String,
}

impl MonitorApi {
    pub fn new(base_url: impl Into<String>, policy: RetryPolicy) -> Result<Self, ApiError> {
        Ok(Self {
            pipeline: RequestPipeline::new(policy)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn proxy_endpoint(&self, path: &str, target: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("{}{}?url={}", self.base_url, path, encoded)
    }

    /// Browser-openable URL for the pass-through proxy view of `target`.
    pub fn proxy_url(&self, target: &str) -> String {
        self.proxy_endpoint("/proxy", target)
    }

    /// Pass-through fetch of an arbitrary URL via the backend proxy.
    pub async fn proxy(&self, target: &str) -> Result<String, ApiError> {
        self.pipeline
            .get_text(&self.proxy_endpoint("/proxy", target))
            .await
    }

    /// Pass-through fetch with the backend's mobile user agent.
    pub async fn mobile_proxy(&self, target: &str) -> Result<String, ApiError> {
        self.pipeline
            .get_text(&self.proxy_endpoint("/mobile_proxy", target))
            .await
    }

    /// Pass-through fetch for page resources (images, styles).
    pub async fn resource_proxy(&self, target: &str) -> Result<String, ApiError> {
        self.pipeline
            .get_text(&self.proxy_endpoint("/resource_proxy", target))
            .await
    }
}

#[async_trait]
impl MonitorBackend for MonitorApi {
    async fn fetch_catalog(&self) -> Result<Catalog, ApiError> {
        let envelope: KeywordsEnvelope =
            self.pipeline.get_json(&self.endpoint("/api/keywords")).await?;
        reject_app_error(envelope.error)?;
        Ok(envelope.keywords.unwrap_or_default())
    }

    async fn save_catalog(&self, catalog: &Catalog) -> Result<(), ApiError> {
        let envelope: AckEnvelope = self
            .pipeline
            .post_json(&self.endpoint("/resources/keywords.json"), catalog)
            .await?;
        reject_app_error(envelope.error)
    }

    async fn fetch_results(&self) -> Result<ResultsSnapshot, ApiError> {
        let envelope: ResultsEnvelope =
            self.pipeline.get_json(&self.endpoint("/api/results")).await?;
        reject_app_error(envelope.error)?;
        Ok(ResultsSnapshot {
            results: envelope.results,
            last_updated: envelope.last_updated,
        })
    }

    async fn start_crawl(&self, keywords: &[String]) -> Result<CrawlOutcome, ApiError> {
        let envelope: CrawlEnvelope = self
            .pipeline
            .post_json(&self.endpoint("/crawl"), &keywords)
            .await?;
        reject_app_error(envelope.error)?;
        Ok(CrawlOutcome {
            message: envelope.message,
            new_results: envelope.new_results,
        })
    }

    async fn delete_record(&self, landing_page: &str) -> Result<(), ApiError> {
        let envelope: AckEnvelope = self
            .pipeline
            .post_json(&self.endpoint("/delete_record"), &DeletePayload { landing_page })
            .await?;
        reject_app_error(envelope.error)
    }

    async fn expand_keywords(&self, category: &str) -> Result<Vec<String>, ApiError> {
        // The expansion endpoint answers with a bare JSON array on success
        // and an `{error}` object on failure.
        let envelope: ExpandEnvelope = self
            .pipeline
            .post_json(&self.endpoint("/expand_keywords"), &ExpandPayload { category })
            .await?;
        match envelope {
            ExpandEnvelope::Keywords(keywords) => Ok(keywords),
            ExpandEnvelope::Error { error } => Err(ApiError::new(ErrorKind::Application, error)),
        }
    }
}

/// An `{error}` field in a 200 body is an application failure; never retried.
fn reject_app_error(error: Option<String>) -> Result<(), ApiError> {
    match error {
        Some(message) => Err(ApiError::new(ErrorKind::Application, message)),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct KeywordsEnvelope {
    #[serde(default)]
    keywords: Option<Catalog>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultsEnvelope {
    #[serde(default)]
    results: Vec<AdRecord>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrawlEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    new_results: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpandEnvelope {
    Error { error: String },
    Keywords(Vec<String>),
}

#[derive(Debug, Serialize)]
struct DeletePayload<'a> {
    landing_page: &'a str,
}

#[derive(Debug, Serialize)]
struct ExpandPayload<'a> {
    category: &'a str,
}
