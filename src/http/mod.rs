//! HTTP client module
//!
//! Every Canvas request goes through [`HttpClient`].
//!
//! # Features
//!
//! - **Bearer Authorization**: Credential read from the shared store per request
//! - **Automatic Retries**: Transient failures retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor

mod client;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, DEFAULT_BASE_URL,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
