// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Canvas Planner
//!
//! Client core for the Canvas LMS REST API: authenticated, paginated
//! fetching of courses, planner items and assignments, with a
//! human-in-the-loop credential refresh flow.
//!
//! ## Features
//!
//! - **Link header pagination**: follows `rel="next"` until the last page
//! - **Time windows**: day / week / month / semester planner queries
//! - **Credential guard**: failed operations yield a continuation that is
//!   resumed with a new token or cancelled
//! - **Typed results**: public fetches return [`Fetched`], never an error
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use canvas_planner::{CanvasClient, ClientConfig, RangeSelector};
//!
//! #[tokio::main]
//! async fn main() -> canvas_planner::Result<()> {
//!     let config = ClientConfig::from_file("canvas.yaml")?.apply_env();
//!     let client = CanvasClient::new(&config)?;
//!
//!     let week = client.assignments_in_window(Some(RangeSelector::Week)).await;
//!     match week.failure {
//!         None => println!("{} items due", week.data.len()),
//!         Some(failure) => eprintln!("fetch failed: {failure}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        CanvasClient                          │
//! │  courses()  current_user()  mark_complete()  assignments_*() │
//! └──────────────────────────────────────────────────────────────┘
//!        │                 │                      │
//! ┌──────┴──────┐  ┌───────┴────────┐  ┌──────────┴──────────┐
//! │ Credential  │  │  Assignment    │  │  TimeWindow         │
//! │ Guard       │  │  Aggregator    │  │  Resolver           │
//! └──────┬──────┘  └───────┬────────┘  └─────────────────────┘
//!        │         ┌───────┴────────┐
//!        │         │ Paginated      │
//!        │         │ Fetcher + Link │
//!        │         └───────┬────────┘
//! ┌──────┴─────────────────┴───────────────────────────────────┐
//! │        HttpClient (bearer from CredentialStore)            │
//! │        retry / backoff / rate limit                        │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// Link header parsing and paginated fetching
pub mod pagination;

/// Request windows for planner queries
pub mod window;

/// Credential store, guard and account sync
pub mod auth;

/// Assignment aggregation and normalization
pub mod assignments;

/// High-level client facade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use assignments::{CanvasUser, Course, NormalizedAssignment, PlannerOverride};
pub use auth::{run_guarded, CredentialGuard, CredentialStore, Guarded};
pub use client::CanvasClient;
pub use config::ClientConfig;
pub use window::{RangeSelector, TimeWindowResolver};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
