//! HTTP client with retry and rate limiting
//!
//! Provides the client every Canvas request goes through. It handles:
//! - Bearer authorization from the shared credential store
//! - Relative paths resolved against a fixed API base, and absolute URLs
//!   confined to the base's origin so the token never leaves it
//! - Automatic retries with configurable backoff for transient failures
//! - Rate limiting to stay under the API's throttling threshold

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{Credential, CredentialStore};
use crate::error::{Error, Result};
use crate::types::{BackoffType, QueryPairs};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default Canvas API base
pub const DEFAULT_BASE_URL: &str = "https://canvas.instructure.com/api/v1";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL every relative path is resolved against
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of transport retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(30),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("canvas-planner/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in order
    pub query: QueryPairs,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter (repeated keys are kept)
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// HTTP client for the Canvas API
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    base: Url,
    credentials: CredentialStore,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client that authorizes requests from `credentials`
    pub fn new(config: HttpClientConfig, credentials: CredentialStore) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        let base = Url::parse(&config.base_url)?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            base,
            credentials,
            rate_limiter,
        })
    }

    /// The credential store this client reads from
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Make a GET request with config
    pub async fn get_with_config(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::GET, url, config).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::PUT, url, RequestConfig::default().json(body))
            .await
    }

    /// Make a generic request.
    ///
    /// Transport failures, timeouts, 5xx and 429 are retried up to
    /// `max_retries` times; 429 waits for its `Retry-After`.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url)?;
        let max_retries = config.max_retries.unwrap_or(self.config.max_retries);
        let timeout = config.timeout.unwrap_or(self.config.timeout);

        let credential = self
            .credentials
            .get()
            .await
            .filter(|c| !c.is_empty())
            .ok_or(Error::MissingCredential)?;

        let mut attempt = 0;
        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let err = match self
                .send_once(&method, &full_url, &credential, &config, timeout)
                .await
            {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };
            if attempt >= max_retries || !err.is_retryable() {
                return Err(err);
            }

            let delay = match &err {
                Error::RateLimited {
                    retry_after_seconds,
                } => Duration::from_secs(*retry_after_seconds),
                _ => self.calculate_backoff(attempt),
            };
            attempt += 1;
            warn!(
                "{method} {full_url} failed ({err}), attempt {attempt}/{}, retrying in {delay:?}",
                max_retries + 1
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// One attempt, with error statuses mapped onto [`Error`]
    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        credential: &Credential,
        config: &RequestConfig,
        timeout: Duration,
    ) -> Result<Response> {
        let mut req = self
            .client
            .request(method.clone(), url)
            .bearer_auth(credential.expose())
            .timeout(timeout);

        for (key, value) in self.config.default_headers.iter().chain(&config.headers) {
            req = req.header(key.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        debug!("{} {} -> {}", method, url, status.as_u16());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized {
                status: status.as_u16(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited {
                retry_after_seconds: extract_retry_after(&response),
            }),
            _ if status.is_client_error() || status.is_server_error() => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::http_status(status.as_u16(), body))
            }
            _ => Ok(response),
        }
    }

    /// Make a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, url, config).await?;
        let json: T = response.json().await.map_err(Error::Http)?;
        Ok(json)
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request_json(Method::GET, url, RequestConfig::default())
            .await
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Build full URL from path.
    ///
    /// Absolute URLs are accepted only on the base's origin.
    pub fn build_url(&self, path: &str) -> Result<String> {
        if let Some(url) = parse_absolute(path)? {
            self.check_origin(&url)?;
            return Ok(path.to_string());
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(format!("{base}/{path}"))
    }

    /// Turn a pagination link into a path relative to the base.
    ///
    /// Relative links pass through. Same-origin links outside the base path
    /// stay absolute; links on another origin are refused.
    pub fn strip_base(&self, link: &str) -> Result<String> {
        let Some(url) = parse_absolute(link)? else {
            return Ok(link.to_string());
        };
        self.check_origin(&url)?;

        let base_path = self.base.path().trim_end_matches('/');
        match url.path().strip_prefix(base_path) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                let mut relative = rest.trim_start_matches('/').to_string();
                if let Some(query) = url.query() {
                    relative.push('?');
                    relative.push_str(query);
                }
                Ok(relative)
            }
            _ => Ok(url.into()),
        }
    }

    fn check_origin(&self, url: &Url) -> Result<()> {
        if url.origin() == self.base.origin() {
            Ok(())
        } else {
            Err(Error::ForeignOrigin {
                url: url.to_string(),
            })
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// `Some` for an absolute URL, `None` for a relative path
fn parse_absolute(value: &str) -> Result<Option<Url>> {
    match Url::parse(value) {
        Ok(url) => Ok(Some(url)),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
