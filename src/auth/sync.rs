//! Remote account sync
//!
//! After a human supplies a new credential it is also pushed to the user's
//! account record on the application backend, so the next login starts with
//! the fresh token. This is best-effort: the guard logs failures and carries on.

use super::store::Credential;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Persists a refreshed credential somewhere outside this process
#[async_trait]
pub trait AccountSync: Send + Sync {
    /// Push the credential to the remote account record
    async fn push_credential(&self, credential: &Credential) -> Result<()>;
}

/// Account sync over HTTP: `PUT <url>` with `{"canvasToken": "<token>"}`
#[derive(Debug, Clone)]
pub struct HttpAccountSync {
    client: Client,
    url: String,
    bearer: Option<String>,
}

impl HttpAccountSync {
    /// Create an account sync for the given endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            bearer: None,
        }
    }

    /// Authenticate against the backend with its own bearer token
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Use a custom reqwest client
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AccountSync for HttpAccountSync {
    async fn push_credential(&self, credential: &Credential) -> Result<()> {
        let mut req = self
            .client
            .put(&self.url)
            .timeout(Duration::from_secs(10))
            .json(&json!({ "canvasToken": credential.expose() }));

        if let Some(ref bearer) = self.bearer {
            req = req.bearer_auth(bearer);
        }

        let response = req.send().await.map_err(Error::Http)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::account_sync(format!(
                "PUT {} returned {}: {body}",
                self.url,
                status.as_u16()
            )));
        }

        debug!("Pushed refreshed credential to {}", self.url);
        Ok(())
    }
}
