//! RFC 5988 `Link` header parsing
//!
//! Canvas paginates list endpoints with headers like:
//!
//! ```text
//! <https://school.instructure.com/api/v1/courses?page=2&per_page=10>; rel="next",
//! <https://school.instructure.com/api/v1/courses?page=1&per_page=10>; rel="first"
//! ```
//!
//! Parsing is lenient: entries that don't match `<url>; rel="name"` are
//! skipped, and a repeated relation keeps the last entry.

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::trace;

static LINK_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).unwrap());

/// One relation from a `Link` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Relation name (`next`, `prev`, `first`, `last`, `current`, ...)
    pub relation: String,
    /// Target URL, exactly as sent by the server
    pub url: String,
    /// Value of the `page` query parameter, when the URL carries one
    pub page: Option<String>,
}

impl PageLink {
    fn new(relation: &str, url: &str) -> Self {
        Self {
            relation: relation.to_string(),
            url: url.to_string(),
            page: page_param(url),
        }
    }
}

/// Relation name to link mapping parsed from one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: HashMap<String, PageLink>,
}

impl LinkSet {
    /// Parse the `Link` header of a response
    pub fn from_headers(headers: &HeaderMap) -> Self {
        parse_link_header(headers.get(LINK).and_then(|v| v.to_str().ok()))
    }

    /// Link for a relation
    pub fn get(&self, relation: &str) -> Option<&PageLink> {
        self.links.get(relation)
    }

    /// The `next` link, if any
    pub fn next(&self) -> Option<&PageLink> {
        self.get("next")
    }

    /// Number of distinct relations
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Check if no relations were found
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterate over all links
    pub fn iter(&self) -> impl Iterator<Item = &PageLink> {
        self.links.values()
    }
}

/// Parse a raw `Link` header value. An absent header yields an empty set.
pub fn parse_link_header(header: Option<&str>) -> LinkSet {
    let mut links = HashMap::new();

    let Some(header) = header else {
        return LinkSet { links };
    };

    // Scan the whole value rather than splitting on ',' since URLs may contain commas
    for caps in LINK_ENTRY.captures_iter(header) {
        let link = PageLink::new(&caps[2], &caps[1]);
        links.insert(link.relation.clone(), link);
    }

    trace!(relations = links.len(), "Parsed link header: {header}");
    LinkSet { links }
}

/// Extract the `page` query parameter from a URL (absolute or relative)
fn page_param(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
}
