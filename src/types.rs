//! Common types used throughout the client
//!
//! This module contains shared type definitions, type aliases,
//! and the `Fetched` result wrapper returned by every public entry point.

use crate::error::Error;
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// Ordered query parameters; keys may repeat (e.g. `include[]`)
pub type QueryPairs = Vec<(String, String)>;

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Broad category of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, DNS, timeout or unexpected HTTP status
    Transport,
    /// Credential missing, rejected, or refresh abandoned
    Authorization,
    /// Response body did not have the expected shape
    Decode,
    /// A configured page or retry cap was hit
    Limit,
    /// Anything else
    Other,
}

/// Why a fetch produced no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable description
    pub message: String,
}

impl From<&Error> for FetchFailure {
    fn from(err: &Error) -> Self {
        match err {
            Error::Fetch(failure) => failure.clone(),
            _ => Self {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Result of a public fetch operation.
///
/// Never an error: `data` is always usable. When `failure` is set, `data`
/// holds the empty value, so "nothing in range" and "fetch failed" stay
/// distinguishable without raising anything to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched<T> {
    /// The fetched data (empty/default on failure)
    pub data: T,
    /// Set when the fetch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FetchFailure>,
}

impl<T> Fetched<T> {
    /// Successful fetch
    pub fn ok(data: T) -> Self {
        Self {
            data,
            failure: None,
        }
    }

    /// Check if the fetch succeeded
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Check if the fetch failed
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Convert back into a `Result`, for use inside guarded operations
    pub fn into_result(self) -> crate::Result<T> {
        match self.failure {
            None => Ok(self.data),
            Some(failure) => Err(Error::Fetch(failure)),
        }
    }
}

impl<T: Default> Fetched<T> {
    /// Failed fetch with empty data
    pub fn failed(err: &Error) -> Self {
        Self {
            data: T::default(),
            failure: Some(FetchFailure::from(err)),
        }
    }

    /// Build from a `Result`, swallowing the error into `failure`
    pub fn from_result(result: crate::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failed(&err),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
