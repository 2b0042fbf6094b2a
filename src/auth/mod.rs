//! Authentication module
//!
//! Owns the bearer credential and the refresh-and-retry flow around it.
//!
//! - [`CredentialStore`]: single shared slot read by every outgoing request
//! - [`CredentialGuard`]: runs an operation and, on failure, yields a
//!   [`PendingRefresh`] continuation that is resumed with a new credential
//! - [`AccountSync`]: best-effort push of refreshed credentials to the backend
//! - [`run_guarded`]: drives a guard to completion with a [`CredentialPrompt`]

mod guard;
mod store;
mod sync;

pub use guard::{
    run_guarded, CredentialGuard, CredentialPrompt, GuardOutcome, GuardState, Guarded,
    PendingRefresh,
};
pub use store::{Credential, CredentialStore};
pub use sync::{AccountSync, HttpAccountSync};
