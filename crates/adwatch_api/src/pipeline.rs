use std::time::Duration;

use client_logging::{client_debug, client_warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{ApiError, ErrorKind};

/// HTTP status codes treated as transient and worth retrying.
pub const TRANSIENT_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Retry and timeout configuration for the request pipeline.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Bound on each individual attempt; timed-out attempts are aborted.
    pub request_timeout: Duration,
    /// Retry budget on top of the initial attempt.
    pub max_retries: u32,
    /// Base of the exponential backoff between attempts.
    pub base_delay: Duration,
    /// Status codes that consume retry budget instead of failing outright.
    pub transient_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(30_000),
            max_retries: 3,
            base_delay: Duration::from_millis(1_000),
            transient_statuses: TRANSIENT_STATUS_CODES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry `n` (1-based): `base_delay * 2^(n-1)`.
    ///
    /// Deterministic, no jitter; for the default base delay the sequence is
    /// exactly 1000 ms, 2000 ms, 4000 ms.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }

    pub fn is_transient(&self, status: u16) -> bool {
        self.transient_statuses.contains(&status)
    }
}

/// Sends JSON requests with per-attempt timeouts and exponential-backoff
/// retries. Holds no mutable state beyond its configuration.
#[derive(Debug, Clone)]
pub struct RequestPipeline {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl RequestPipeline {
    pub fn new(policy: RetryPolicy) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(policy.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ErrorKind::Network, err.to_string()))?;
        Ok(Self { client, policy })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let text = self.execute(reqwest::Method::GET, url, None).await?;
        decode(&text)
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        // Serialized once up front so every retry sends the same payload.
        let payload = serde_json::to_value(body)
            .map_err(|err| ApiError::new(ErrorKind::Decode, err.to_string()))?;
        let text = self
            .execute(reqwest::Method::POST, url, Some(payload))
            .await?;
        decode(&text)
    }

    /// Raw-body GET for the pass-through proxy endpoints.
    pub async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        self.execute(reqwest::Method::GET, url, None).await
    }

    async fn execute(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| ApiError::new(ErrorKind::InvalidUrl, err.to_string()))?;

        let mut retries = 0u32;
        loop {
            match self.attempt(method.clone(), parsed.clone(), body.as_ref()).await {
                Ok(text) => return Ok(text),
                Err(err) if !self.is_retryable(&err) => return Err(err),
                Err(err) => {
                    retries += 1;
                    if retries > self.policy.max_retries {
                        return Err(ApiError::new(
                            err.kind,
                            format!(
                                "request failed after {} retries: {}",
                                self.policy.max_retries, err.message
                            ),
                        ));
                    }
                    let delay = self.policy.backoff_delay(retries);
                    client_warn!(
                        "retry {}/{} for {} in {} ms ({})",
                        retries,
                        self.policy.max_retries,
                        parsed,
                        delay.as_millis(),
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn attempt(
        &self,
        method: reqwest::Method,
        url: reqwest::Url,
        body: Option<&serde_json::Value>,
    ) -> Result<String, ApiError> {
        client_debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(ApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ErrorKind::Http(status.as_u16()),
                format!("http status {}", status.as_u16()),
            ));
        }
        response.text().await.map_err(ApiError::from_reqwest)
    }

    fn is_retryable(&self, err: &ApiError) -> bool {
        match err.kind {
            ErrorKind::Timeout => true,
            ErrorKind::Http(status) => self.policy.is_transient(status),
            _ => false,
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text)
        .map_err(|err| ApiError::new(ErrorKind::Decode, format!("malformed response: {err}")))
}
