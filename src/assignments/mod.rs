//! Assignment aggregation
//!
//! Canvas exposes due work through two endpoints with different shapes:
//! the aggregated planner (`planner/items`) and per-course assignment lists.
//! This module fetches from either and returns one [`NormalizedAssignment`]
//! shape.

mod aggregator;
mod normalize;
mod types;

pub use aggregator::{AssignmentAggregator, DEFAULT_PER_PAGE};
pub use normalize::{normalize_course_assignments, normalize_planner_items};
pub use types::{
    AssignmentSource, CanvasUser, Course, NormalizedAssignment, PlannerOverride,
};
