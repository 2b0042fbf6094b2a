//! Credential guard
//!
//! Wraps an authenticated operation. When the operation fails the guard moves
//! to `Refreshing` and hands back a [`PendingRefresh`] continuation instead of
//! prompting anyone itself. The caller obtains a replacement credential however
//! it likes and calls [`PendingRefresh::resume`], or abandons the operation
//! with [`PendingRefresh::cancel`].
//!
//! Any failure triggers a refresh, not only HTTP 401: the guarded operation
//! may be an aggregate that has already flattened the status away.

use super::store::{Credential, CredentialStore};
use super::sync::AccountSync;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// Current credential believed valid
    #[default]
    Authorized,
    /// Waiting for a human-supplied replacement
    Refreshing,
}

/// Result of one guarded attempt
pub enum GuardOutcome<'g, T, F> {
    /// The operation succeeded
    Completed(T),
    /// The operation failed; a new credential is needed to retry
    NeedsCredential(PendingRefresh<'g, F>),
    /// The refresh cap was reached
    Failed(Error),
}

impl<T, F> GuardOutcome<'_, T, F> {
    /// Check if the operation completed
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Check if a new credential is being requested
    pub fn needs_credential(&self) -> bool {
        matches!(self, Self::NeedsCredential(_))
    }
}

impl<T: std::fmt::Debug, F> std::fmt::Debug for GuardOutcome<'_, T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed(value) => f.debug_tuple("Completed").field(value).finish(),
            Self::NeedsCredential(pending) => f
                .debug_struct("NeedsCredential")
                .field("refreshes", &pending.refreshes)
                .field("error", &pending.error)
                .finish(),
            Self::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// A failed operation waiting for a new credential
pub struct PendingRefresh<'g, F> {
    guard: &'g CredentialGuard,
    operation: F,
    refreshes: u32,
    error: Error,
}

impl<'g, F> PendingRefresh<'g, F> {
    /// The failure that triggered the refresh
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Number of refreshes already performed for this operation
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    /// Store the new credential and run the operation again
    pub async fn resume<T, Fut>(self, credential: impl Into<String>) -> GuardOutcome<'g, T, F>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let credential = Credential::new(credential);
        let guard = self.guard;

        guard.store.set(credential.clone()).await;
        info!(refreshes = self.refreshes + 1, "Credential replaced, retrying");

        if let Some(ref sync) = guard.account_sync {
            if let Err(e) = sync.push_credential(&credential).await {
                warn!("Failed to push refreshed credential to account: {e}");
            }
        }

        guard.set_state(GuardState::Authorized).await;
        guard.attempt(self.operation, self.refreshes + 1).await
    }

    /// Abandon the operation; nothing is delivered and nothing is retried
    pub async fn cancel(self) {
        info!("Credential refresh cancelled, operation abandoned");
    }
}

/// Wraps authenticated operations with refresh-and-retry
pub struct CredentialGuard {
    store: CredentialStore,
    account_sync: Option<Arc<dyn AccountSync>>,
    state: Arc<RwLock<GuardState>>,
    max_refresh_attempts: Option<u32>,
}

impl CredentialGuard {
    /// Create a guard over the given credential store (no refresh cap)
    pub fn new(store: CredentialStore) -> Self {
        Self {
            store,
            account_sync: None,
            state: Arc::new(RwLock::new(GuardState::Authorized)),
            max_refresh_attempts: None,
        }
    }

    /// Push refreshed credentials to a remote account record
    #[must_use]
    pub fn with_account_sync(mut self, sync: Arc<dyn AccountSync>) -> Self {
        self.account_sync = Some(sync);
        self
    }

    /// Limit the number of refreshes per operation (`None` = unlimited)
    #[must_use]
    pub fn with_max_refresh_attempts(mut self, max: Option<u32>) -> Self {
        self.max_refresh_attempts = max;
        self
    }

    /// The credential store this guard writes to
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Current state
    pub async fn state(&self) -> GuardState {
        *self.state.read().await
    }

    /// Run an operation under the guard
    pub async fn invoke<T, F, Fut>(&self, operation: F) -> GuardOutcome<'_, T, F>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.attempt(operation, 0).await
    }

    async fn attempt<T, F, Fut>(&self, operation: F, refreshes: u32) -> GuardOutcome<'_, T, F>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match operation().await {
            Ok(value) => GuardOutcome::Completed(value),
            Err(error) => {
                if let Some(max) = self.max_refresh_attempts {
                    if refreshes >= max {
                        warn!("Giving up after {refreshes} credential refreshes: {error}");
                        return GuardOutcome::Failed(Error::RefreshLimitExceeded {
                            max_attempts: max,
                            last_error: error.to_string(),
                        });
                    }
                }

                info!("Guarded operation failed, requesting new credential: {error}");
                self.set_state(GuardState::Refreshing).await;
                GuardOutcome::NeedsCredential(PendingRefresh {
                    guard: self,
                    operation,
                    refreshes,
                    error,
                })
            }
        }
    }

    async fn set_state(&self, state: GuardState) {
        *self.state.write().await = state;
    }
}

impl std::fmt::Debug for CredentialGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialGuard")
            .field("has_account_sync", &self.account_sync.is_some())
            .field("max_refresh_attempts", &self.max_refresh_attempts)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Interactive driver
// ============================================================================

/// Source of replacement credentials (a modal, a terminal prompt, ...)
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    /// Ask for a new credential; `None` means the human cancelled
    async fn request_credential(&self, reason: &Error) -> Option<String>;
}

/// Final result of [`run_guarded`]
#[derive(Debug)]
pub enum Guarded<T> {
    /// The operation eventually succeeded
    Completed(T),
    /// The human cancelled the refresh prompt
    Cancelled,
    /// The refresh cap was reached
    Failed(Error),
}

impl<T> Guarded<T> {
    /// The completed value, if any
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Completed(value) => Ok(value),
            Self::Cancelled => Err(Error::RefreshCancelled),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Run an operation under the guard, asking `prompt` for a new credential
/// each time it fails.
pub async fn run_guarded<T, F, Fut, P>(
    guard: &CredentialGuard,
    prompt: &P,
    operation: F,
) -> Guarded<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: CredentialPrompt + ?Sized,
{
    let mut outcome = guard.invoke(operation).await;
    loop {
        match outcome {
            GuardOutcome::Completed(value) => return Guarded::Completed(value),
            GuardOutcome::Failed(err) => return Guarded::Failed(err),
            GuardOutcome::NeedsCredential(pending) => {
                match prompt.request_credential(pending.error()).await {
                    Some(token) => outcome = pending.resume(token).await,
                    None => {
                        pending.cancel().await;
                        return Guarded::Cancelled;
                    }
                }
            }
        }
    }
}
