//! Assignment aggregation
//!
//! Builds fetch plans for the planner and per-course endpoints, runs them
//! through a [`RecordSource`] and normalizes the result. Failures never
//! escape: they come back as a [`Fetched`] with empty data and a failure set.

use super::normalize::{normalize_course_assignments, normalize_planner_items};
use super::types::{Course, NormalizedAssignment};
use crate::error::Result;
use crate::pagination::{FetchPlan, RecordSource};
use crate::types::Fetched;
use crate::window::{RangeSelector, RequestWindow, TimeWindowResolver};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default `per_page` for list requests
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Fans out assignment requests and normalizes the results
#[derive(Clone)]
pub struct AssignmentAggregator {
    source: Arc<dyn RecordSource>,
    resolver: TimeWindowResolver,
    per_page: u32,
}

impl AssignmentAggregator {
    /// Create an aggregator over a record source
    pub fn new(source: Arc<dyn RecordSource>, resolver: TimeWindowResolver) -> Self {
        Self {
            source,
            resolver,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Set `per_page` for list requests
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// The window resolver in use
    pub fn resolver(&self) -> &TimeWindowResolver {
        &self.resolver
    }

    /// Plan for planner items inside a window
    pub fn planner_plan(&self, window: &RequestWindow) -> FetchPlan {
        FetchPlan::new("planner/items")
            .query("start_date", window.start_param())
            .query("end_date", window.end_param())
            .query("per_page", self.per_page.to_string())
    }

    /// Plan for one course's assignments, with submission data embedded
    pub fn course_plan(&self, course_id: u64) -> FetchPlan {
        FetchPlan::new(format!("courses/{course_id}/assignments"))
            .query("include[]", "submission")
            .query("per_page", self.per_page.to_string())
    }

    /// Planner items in the window for `selector` (`None` = semester)
    pub async fn by_time_window(
        &self,
        selector: Option<RangeSelector>,
    ) -> Fetched<Vec<NormalizedAssignment>> {
        let window = self.resolver.resolve(selector);
        self.by_window(&window).await
    }

    /// Planner items in an already resolved window
    pub async fn by_window(&self, window: &RequestWindow) -> Fetched<Vec<NormalizedAssignment>> {
        let plan = self.planner_plan(window);
        match self.source.fetch_all(&plan).await {
            Ok(records) => {
                debug!(
                    "Fetched {} planner items for {}..{}",
                    records.len(),
                    window.start_param(),
                    window.end_param()
                );
                Fetched::ok(normalize_planner_items(records))
            }
            Err(e) => {
                warn!("Failed to fetch planner items: {e}");
                Fetched::failed(&e)
            }
        }
    }

    /// Assignments of every course, fetched concurrently, in course order
    pub async fn by_courses(&self, courses: &[Course]) -> Fetched<Vec<NormalizedAssignment>> {
        let plans: Vec<FetchPlan> = courses.iter().map(|c| self.course_plan(c.id)).collect();

        let results = join_all(plans.iter().map(|plan| self.source.fetch_all(plan))).await;

        match collect_per_course(courses, results) {
            Ok(assignments) => Fetched::ok(assignments),
            Err(e) => {
                warn!("Failed to fetch course assignments: {e}");
                Fetched::failed(&e)
            }
        }
    }
}

fn collect_per_course(
    courses: &[Course],
    results: Vec<Result<Vec<serde_json::Value>>>,
) -> Result<Vec<NormalizedAssignment>> {
    let mut assignments = Vec::new();
    for (course, result) in courses.iter().zip(results) {
        assignments.extend(normalize_course_assignments(result?, course));
    }
    Ok(assignments)
}

impl std::fmt::Debug for AssignmentAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentAggregator")
            .field("resolver", &self.resolver)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}
