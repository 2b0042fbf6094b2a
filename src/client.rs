//! Canvas client facade
//!
//! [`CanvasClient`] wires the credential store, HTTP client, paginated
//! fetcher, assignment aggregator and credential guard together from one
//! [`ClientConfig`]. Every public fetch returns a [`Fetched`] value and never
//! an error.

use crate::assignments::{
    AssignmentAggregator, CanvasUser, Course, NormalizedAssignment, PlannerOverride,
};
use crate::auth::{
    run_guarded, Credential, CredentialGuard, CredentialPrompt, CredentialStore, Guarded,
    HttpAccountSync,
};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{FetchPlan, PaginatedFetcher, RecordSource};
use crate::types::Fetched;
use crate::window::{RangeSelector, TimeWindowResolver};
use reqwest::Method;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// High-level Canvas API client
#[derive(Clone)]
pub struct CanvasClient {
    http: Arc<HttpClient>,
    fetcher: Arc<PaginatedFetcher>,
    aggregator: AssignmentAggregator,
    guard: Arc<CredentialGuard>,
    per_page: u32,
}

impl CanvasClient {
    /// Build a client with a fresh credential store seeded from `config.token`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let store = match config.token.as_deref() {
            Some(token) => CredentialStore::with_credential(Credential::new(token)),
            None => CredentialStore::new(),
        };
        Self::with_store(config, store)
    }

    /// Build a client around an existing credential store
    pub fn with_store(config: &ClientConfig, store: CredentialStore) -> Result<Self> {
        config.validate()?;

        let http = Arc::new(HttpClient::new(config.http_config(), store.clone())?);
        let fetcher =
            Arc::new(PaginatedFetcher::new(http.clone()).with_max_pages(config.max_pages));
        let source: Arc<dyn RecordSource> = fetcher.clone();
        let aggregator =
            AssignmentAggregator::new(source, TimeWindowResolver::new(config.semester))
                .with_per_page(config.per_page);

        let mut guard =
            CredentialGuard::new(store).with_max_refresh_attempts(config.max_refresh_attempts);
        if let Some(ref sync) = config.account_sync {
            let mut account_sync = HttpAccountSync::new(&sync.url);
            if let Some(ref token) = sync.token {
                account_sync = account_sync.with_bearer(token);
            }
            guard = guard.with_account_sync(Arc::new(account_sync));
        }

        Ok(Self {
            http,
            fetcher,
            aggregator,
            guard: Arc::new(guard),
            per_page: config.per_page,
        })
    }

    /// The shared credential store
    pub fn credentials(&self) -> &CredentialStore {
        self.http.credentials()
    }

    /// The credential guard for wrapping operations
    pub fn guard(&self) -> &CredentialGuard {
        &self.guard
    }

    /// The assignment aggregator
    pub fn aggregator(&self) -> &AssignmentAggregator {
        &self.aggregator
    }

    /// Courses of the current user
    pub async fn courses(&self) -> Fetched<Vec<Course>> {
        let plan = FetchPlan::new("courses").query("per_page", self.per_page.to_string());
        match self.fetcher.fetch_all(&plan).await {
            Ok(records) => {
                let courses = decode_courses(records);
                debug!("Fetched {} courses", courses.len());
                Fetched::ok(courses)
            }
            Err(e) => {
                warn!("Failed to fetch courses: {e}");
                Fetched::failed(&e)
            }
        }
    }

    /// Mark a planner item complete or not complete
    pub async fn mark_complete(
        &self,
        plannable_id: u64,
        complete: bool,
    ) -> Fetched<Option<PlannerOverride>> {
        let path = format!("planner/overrides/{plannable_id}");
        let body = json!({ "marked_complete": if complete { "true" } else { "false" } });

        let result = self
            .http
            .request_json::<PlannerOverride>(
                Method::PUT,
                &path,
                RequestConfig::default().json(body),
            )
            .await;

        match result {
            Ok(planner_override) => {
                debug!("Planner override {plannable_id} set to complete={complete}");
                Fetched::ok(Some(planner_override))
            }
            Err(e) => {
                warn!("Failed to update planner override {plannable_id}: {e}");
                Fetched::failed(&e)
            }
        }
    }

    /// Planner items inside the window for `selector` (`None` = semester)
    pub async fn assignments_in_window(
        &self,
        selector: Option<RangeSelector>,
    ) -> Fetched<Vec<NormalizedAssignment>> {
        self.aggregator.by_time_window(selector).await
    }

    /// Assignments of every given course, in course order
    pub async fn assignments_for_courses(
        &self,
        courses: &[Course],
    ) -> Fetched<Vec<NormalizedAssignment>> {
        self.aggregator.by_courses(courses).await
    }

    /// The authenticated user
    pub async fn current_user(&self) -> Fetched<Option<CanvasUser>> {
        match self.http.get_json::<CanvasUser>("users/self").await {
            Ok(user) => Fetched::ok(Some(user)),
            Err(e) => {
                warn!("Failed to fetch current user: {e}");
                Fetched::failed(&e)
            }
        }
    }

    /// Run `operation` under this client's credential guard
    pub async fn run_guarded<T, F, Fut, P>(&self, prompt: &P, operation: F) -> Guarded<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
        P: CredentialPrompt + ?Sized,
    {
        run_guarded(&self.guard, prompt, operation).await
    }
}

fn decode_courses(records: Vec<Value>) -> Vec<Course> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Course>(record) {
            Ok(course) => Some(course),
            Err(e) => {
                warn!("Skipping undecodable course: {e}");
                None
            }
        })
        .collect()
}

impl std::fmt::Debug for CanvasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasClient")
            .field("http", &self.http)
            .field("aggregator", &self.aggregator)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}
