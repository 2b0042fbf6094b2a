//! Error types for the Canvas planner client
//!
//! This module defines the error hierarchy for the whole crate.
//! Internal operations return `Result<T, Error>`; the public `CanvasClient`
//! surface converts these into [`crate::types::Fetched`] values instead of
//! propagating them.

use crate::types::{FailureKind, FetchFailure};
use thiserror::Error;

/// The main error type for the Canvas planner client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("No credential available")]
    MissingCredential,

    #[error("Unauthorized (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Credential refresh cancelled")]
    RefreshCancelled,

    #[error("Credential refresh limit ({max_attempts}) reached: {last_error}")]
    RefreshLimitExceeded { max_attempts: u32, last_error: String },

    #[error("Account sync failed: {message}")]
    AccountSync { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Refusing to send credentials to foreign origin: {url}")]
    ForeignOrigin { url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Pagination / Data Errors
    // ============================================================================
    #[error("Page limit ({max_pages}) exceeded for '{path}'")]
    PageLimitExceeded { path: String, max_pages: usize },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// A failure already flattened into a [`crate::types::Fetched`]
    #[error("{0}")]
    Fetch(FetchFailure),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an account sync error
    pub fn account_sync(message: impl Into<String>) -> Self {
        Self::AccountSync {
            message: message.into(),
        }
    }

    /// Check if this error is worth retrying at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error means the current credential was rejected or absent
    pub fn is_authorization(&self) -> bool {
        match self {
            Error::Unauthorized { .. } | Error::MissingCredential => true,
            Error::Fetch(failure) => failure.kind == FailureKind::Authorization,
            _ => false,
        }
    }

    /// Classify this error for callers that only need the broad category
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::MissingCredential
            | Error::Unauthorized { .. }
            | Error::RefreshCancelled
            | Error::RefreshLimitExceeded { .. } => FailureKind::Authorization,
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::RateLimited { .. }
            | Error::Timeout { .. }
            | Error::ForeignOrigin { .. }
            | Error::InvalidUrl(_) => FailureKind::Transport,
            Error::Decode { .. } | Error::JsonParse(_) => FailureKind::Decode,
            Error::PageLimitExceeded { .. } => FailureKind::Limit,
            Error::Fetch(failure) => failure.kind,
            _ => FailureKind::Other,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::Unauthorized { status: 401 };
        assert_eq!(err.to_string(), "Unauthorized (HTTP 401)");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::Unauthorized { status: 401 }.is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::ForeignOrigin {
            url: "https://elsewhere.example.com/".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::Unauthorized { status: 403 }.kind(),
            FailureKind::Authorization
        );
        assert_eq!(Error::MissingCredential.kind(), FailureKind::Authorization);
        assert_eq!(Error::http_status(500, "").kind(), FailureKind::Transport);
        assert_eq!(Error::decode("bad").kind(), FailureKind::Decode);
        assert_eq!(
            Error::PageLimitExceeded {
                path: "courses".to_string(),
                max_pages: 3
            }
            .kind(),
            FailureKind::Limit
        );
        assert_eq!(Error::Other("x".to_string()).kind(), FailureKind::Other);
        assert_eq!(
            Error::Fetch(FetchFailure {
                kind: FailureKind::Limit,
                message: "cap".to_string()
            })
            .kind(),
            FailureKind::Limit
        );
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
