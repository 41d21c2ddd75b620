//! HTTP client for the data-quality platform API
//!
//! Centralizes authentication, timeouts, retry with backoff, and typed
//! error mapping by status class so every resource wrapper gets consistent
//! behaviour.

use crate::error::{Error, Result};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the API, e.g. `https://acme.qualibrate.io/api/`
    pub base_url: String,
    /// Bearer token
    pub token: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries for retryable failures
    pub max_retries: u32,
    /// Initial delay for exponential backoff
    pub initial_backoff: Duration,
    /// Maximum delay for exponential backoff
    pub max_backoff: Duration,
    /// User agent string
    pub user_agent: String,
}

impl ApiClientConfig {
    /// Create a config with default timeouts and retries
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(30),
            user_agent: format!("qualibrate/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max retries
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

/// Authenticated HTTP client with retry and typed errors
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a client for the given base URL and bearer token
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_config(ApiClientConfig::new(base_url, token))
    }

    /// Create a client with custom configuration
    ///
    /// Fails when the base URL does not parse; a bad URL is a setup error
    /// and must surface before the first request.
    pub fn with_config(config: ApiClientConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.request(Method::GET, path, query, None).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request with a JSON body and parse the JSON response
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .request(Method::POST, path, &[], Some(body.clone()))
            .await?;
        Ok(response.json().await?)
    }

    /// Make a PUT request with a JSON body and parse the JSON response
    pub async fn put_json(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self
            .request(Method::PUT, path, &[], Some(body.clone()))
            .await?;
        Ok(response.json().await?)
    }

    /// Make a generic request with bounded retries
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Response> {
        let url = self.build_url(path);
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            let mut req = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(&self.config.token);
            if !query.is_empty() {
                req = req.query(query);
            }
            if let Some(ref body) = body {
                req = req.json(body);
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!("{} {} -> {}", method, url, status);
                        return Ok(response);
                    }

                    if is_retryable_status(status) && attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            "{} {} failed with {}, attempt {}/{}, retrying in {:?}",
                            method,
                            url,
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::from_status(status.as_u16(), body));
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            "{} {} connection failure, attempt {}/{}, retrying in {:?}",
                            method,
                            url,
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(Error::Http(e));
                }
            }
        }
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Exponential backoff delay for a given attempt
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        std::cmp::min(
            self.config.initial_backoff * factor,
            self.config.max_backoff,
        )
    }
}

/// Statuses worth retrying before giving up
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}
