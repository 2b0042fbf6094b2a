//! Credential store
//!
//! Holds the single current bearer credential. The store is a cheap handle
//! over a shared slot: the HTTP client reads it on every request and only the
//! credential guard's refresh path writes it.

use std::sync::Arc;
use tokio::sync::RwLock;

/// An opaque bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a credential, trimming surrounding whitespace
    pub fn new(token: impl Into<String>) -> Self {
        let token: String = token.into();
        Self(token.trim().to_string())
    }

    /// The raw token value, for the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if the token is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Shared slot for the current credential
///
/// Clones share the same slot. Writes replace the credential wholesale.
#[derive(Clone, Default)]
pub struct CredentialStore {
    slot: Arc<RwLock<Option<Credential>>>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding an initial credential
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(credential))),
        }
    }

    /// Current credential, if any
    pub async fn get(&self) -> Option<Credential> {
        self.slot.read().await.clone()
    }

    /// Replace the current credential
    pub async fn set(&self, credential: Credential) {
        *self.slot.write().await = Some(credential);
    }

    /// Remove the current credential (logout)
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }

    /// Check if a credential is present
    pub async fn is_set(&self) -> bool {
        self.slot.read().await.is_some()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}
