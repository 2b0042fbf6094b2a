//! Paginated record fetching
//!
//! Follows `next` links until the server stops sending one, accumulating
//! every page's records in order. Pages are fetched strictly one after the
//! other since each request depends on the previous response's headers.

use super::link::LinkSet;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::QueryPairs;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A list request to run, possibly across many pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    /// Path relative to the API base
    pub path: String,
    /// Query parameters for the first page
    pub query: QueryPairs,
    /// Follow `next` links (false = exactly one request)
    pub follow_all_pages: bool,
}

impl FetchPlan {
    /// Plan that follows every page of `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            follow_all_pages: true,
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Fetch only the first page
    #[must_use]
    pub fn single_page(mut self) -> Self {
        self.follow_all_pages = false;
        self
    }
}

/// Anything that can run a [`FetchPlan`] to a flat list of raw records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record the plan covers. Fails as a whole: no partial results.
    async fn fetch_all(&self, plan: &FetchPlan) -> Result<Vec<Value>>;
}

/// Link-header driven fetcher over [`HttpClient`]
#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    client: Arc<HttpClient>,
    max_pages: Option<usize>,
}

impl PaginatedFetcher {
    /// Create a fetcher with no page cap
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            max_pages: None,
        }
    }

    /// Cap the number of pages per call (`None` = follow forever)
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// The HTTP client pages are fetched with
    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    /// Fetch one page and its links
    pub async fn fetch_page(&self, url: &str, query: QueryPairs) -> Result<(Vec<Value>, LinkSet)> {
        let response = self
            .client
            .get_with_config(url, RequestConfig::new().queries(query))
            .await?;

        let links = LinkSet::from_headers(response.headers());
        let body: Value = response.json().await.map_err(Error::Http)?;

        match body {
            Value::Array(records) => Ok((records, links)),
            other => Err(Error::decode(format!(
                "expected a JSON array from '{url}', got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[async_trait]
impl RecordSource for PaginatedFetcher {
    async fn fetch_all(&self, plan: &FetchPlan) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut next = Some(plan.path.clone());
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            if let Some(max_pages) = self.max_pages {
                if pages >= max_pages {
                    return Err(Error::PageLimitExceeded {
                        path: plan.path.clone(),
                        max_pages,
                    });
                }
            }

            let query = if pages == 0 {
                plan.query.clone()
            } else {
                missing_params(&url, &plan.query)
            };

            let (page, links) = self.fetch_page(&url, query).await?;
            pages += 1;
            debug!(page = pages, records = page.len(), "Fetched {}", url);
            records.extend(page);

            if !plan.follow_all_pages {
                break;
            }
            next = links
                .next()
                .map(|link| self.client.strip_base(&link.url))
                .transpose()?;
        }

        Ok(records)
    }
}

/// Parameters from `query` whose key does not already appear in `url`
fn missing_params(url: &str, query: &QueryPairs) -> QueryPairs {
    let present: HashSet<String> = url
        .split_once('?')
        .map(|(_, qs)| {
            url::form_urlencoded::parse(qs.as_bytes())
                .map(|(key, _)| key.into_owned())
                .collect()
        })
        .unwrap_or_default();

    query
        .iter()
        .filter(|(key, _)| !present.contains(key))
        .cloned()
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod fetcher_unit_tests {
    use super::*;

    #[test]
    fn test_missing_params_skips_echoed_keys() {
        let query = vec![
            ("include[]".to_string(), "submission".to_string()),
            ("per_page".to_string(), "100".to_string()),
            ("order".to_string(), "due_at".to_string()),
        ];

        let missing = missing_params(
            "courses/1/assignments?include%5B%5D=submission&page=2&per_page=100",
            &query,
        );

        assert_eq!(missing, vec![("order".to_string(), "due_at".to_string())]);
    }

    #[test]
    fn test_missing_params_without_query_string() {
        let query = vec![("per_page".to_string(), "100".to_string())];
        assert_eq!(missing_params("courses", &query), query);
    }
}
