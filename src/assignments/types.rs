//! Canvas payload models and the normalized assignment shape
//!
//! Raw models only declare the fields we read; everything else in the
//! payload is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Public models
// ============================================================================

/// A course the user is enrolled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Canvas course id
    pub id: u64,
    /// Display name (absent for date-restricted courses)
    #[serde(default)]
    pub name: Option<String>,
    /// Short course code
    #[serde(default)]
    pub course_code: Option<String>,
}

impl Course {
    /// Create a course reference by id
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: None,
            course_code: None,
        }
    }
}

/// The authenticated Canvas user (`users/self`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasUser {
    /// Canvas user id
    pub id: u64,
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Short display name
    #[serde(default)]
    pub short_name: Option<String>,
    /// Login id or email
    #[serde(default)]
    pub login_id: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Planner override returned by `PUT planner/overrides/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerOverride {
    /// Override id
    pub id: u64,
    /// Type of the overridden item
    #[serde(default)]
    pub plannable_type: Option<String>,
    /// Whether the item is marked complete
    #[serde(default)]
    pub marked_complete: bool,
}

/// Endpoint a normalized assignment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// `planner/items`
    PlannerItem,
    /// `courses/{id}/assignments`
    CourseAssignment,
}

/// One due-date-bearing unit of work, whatever endpoint it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAssignment {
    /// Canvas id of the assignment / plannable
    pub id: String,
    /// Title
    pub title: String,
    /// Due date, if any
    pub due_at: Option<DateTime<Utc>>,
    /// Submitted or marked complete
    pub completed: bool,
    /// Owning course
    pub course_id: Option<u64>,
    /// Owning course name
    pub course_name: Option<String>,
    /// Link to the item in Canvas
    pub url: Option<String>,
    /// Points possible
    pub points_possible: Option<f64>,
    /// Originating endpoint
    pub source: AssignmentSource,
}

// ============================================================================
// Raw payloads
// ============================================================================

/// Item from `planner/items`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPlannerItem {
    pub plannable_id: Value,
    #[serde(default)]
    pub plannable_type: Option<String>,
    #[serde(default)]
    pub plannable_date: Option<String>,
    #[serde(default)]
    pub plannable: Option<RawPlannable>,
    #[serde(default)]
    pub course_id: Option<u64>,
    #[serde(default)]
    pub context_name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub planner_override: Option<RawOverride>,
    /// `false` when the item takes no submissions, otherwise an object
    #[serde(default)]
    pub submissions: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPlannable {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub points_possible: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawOverride {
    #[serde(default)]
    pub marked_complete: bool,
}

/// Item from `courses/{id}/assignments?include[]=submission`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCourseAssignment {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub due_at: Option<String>,
    #[serde(default)]
    pub course_id: Option<u64>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub points_possible: Option<f64>,
    #[serde(default)]
    pub submission: Option<RawSubmission>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawSubmission {
    #[serde(default)]
    pub workflow_state: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
}
