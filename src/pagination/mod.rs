//! Pagination module
//!
//! Canvas list endpoints paginate through the `Link` response header.
//!
//! # Overview
//!
//! - [`parse_link_header`] turns a raw header into a [`LinkSet`]
//! - [`PaginatedFetcher`] runs a [`FetchPlan`], following `next` links and
//!   concatenating every page's records
//! - [`RecordSource`] abstracts the fetcher for the assignment aggregator

mod fetcher;
mod link;

pub use fetcher::{FetchPlan, PaginatedFetcher, RecordSource};
pub use link::{parse_link_header, LinkSet, PageLink};
