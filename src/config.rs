//! Client configuration
//!
//! Loaded from a YAML file, then overridden from the environment
//! (`CANVAS_BASE_URL`, `CANVAS_TOKEN`) and finally from CLI flags.
//!
//! ```yaml
//! base_url: https://canvas.example.edu/api/v1
//! per_page: 100
//! max_pages: 50
//! max_refresh_attempts: 3
//! semester:
//!   start: 2025-01-06
//!   end: 2025-05-02
//! account_sync:
//!   url: https://planner.example.edu/api/users/me
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, DEFAULT_BASE_URL};
use crate::types::OptionStringExt;
use crate::window::SemesterRange;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "CANVAS_BASE_URL";

/// Environment variable overriding `token`
pub const ENV_TOKEN: &str = "CANVAS_TOKEN";

/// Complete client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Canvas API base, e.g. `https://school.instructure.com/api/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Initial bearer credential
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Transport retries for timeouts and 5xx responses
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// `per_page` sent on list requests
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Page cap per paginated call (`null` = unbounded)
    #[serde(default = "default_max_pages")]
    pub max_pages: Option<usize>,

    /// Credential refreshes per guarded operation (`null` = unbounded)
    #[serde(default = "default_max_refresh_attempts")]
    pub max_refresh_attempts: Option<u32>,

    /// Date range used for the `Semester` selector
    #[serde(default)]
    pub semester: SemesterRange,

    /// Client-side rate limiting (`null` disables it)
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Where refreshed credentials are pushed
    #[serde(default)]
    pub account_sync: Option<AccountSyncConfig>,
}

/// Remote account endpoint for refreshed credentials
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountSyncConfig {
    /// Endpoint receiving `PUT {"canvasToken": ...}`
    pub url: String,

    /// Bearer token for the backend itself
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            max_refresh_attempts: default_max_refresh_attempts(),
            semester: SemesterRange::default(),
            rate_limit: default_rate_limit(),
            account_sync: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_per_page() -> u32 {
    100
}

#[allow(clippy::unnecessary_wraps)]
fn default_max_pages() -> Option<usize> {
    Some(100)
}

#[allow(clippy::unnecessary_wraps)]
fn default_max_refresh_attempts() -> Option<u32> {
    Some(3)
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

impl ClientConfig {
    /// Load and validate a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CANVAS_BASE_URL` / `CANVAS_TOKEN` from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(ENV_BASE_URL).none_if_empty() {
            self.base_url = base_url;
        }
        if let Some(token) = lookup(ENV_TOKEN).none_if_empty() {
            self.token = Some(token);
        }
        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if self.per_page == 0 {
            return Err(Error::invalid_value("per_page", "must be at least 1"));
        }
        if self.max_pages == Some(0) {
            return Err(Error::invalid_value(
                "max_pages",
                "must be at least 1 (use null for no limit)",
            ));
        }
        if let Some(ref sync) = self.account_sync {
            url::Url::parse(&sync.url)?;
        }
        Ok(())
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(self.base_url.trim_end_matches('/'))
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries);

        match self.rate_limit {
            Some(ref limit) => builder.rate_limit(limit.clone()).build(),
            None => builder.no_rate_limit().build(),
        }
    }
}
