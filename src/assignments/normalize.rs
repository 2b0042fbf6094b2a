//! Normalization of planner items and course assignments
//!
//! Records that don't deserialize are skipped with a warning; one odd record
//! from the server should not hide the rest.

use super::types::{
    AssignmentSource, Course, NormalizedAssignment, RawCourseAssignment, RawPlannerItem,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Submission states that count as done
const COMPLETED_STATES: &[&str] = &["submitted", "graded", "pending_review"];

/// Normalize raw `planner/items` records
pub fn normalize_planner_items(records: Vec<Value>) -> Vec<NormalizedAssignment> {
    records
        .into_iter()
        .filter_map(|record| decode::<RawPlannerItem>(record, "planner item"))
        .map(from_planner_item)
        .collect()
}

/// Normalize raw assignment records of one course
pub fn normalize_course_assignments(
    records: Vec<Value>,
    course: &Course,
) -> Vec<NormalizedAssignment> {
    records
        .into_iter()
        .filter_map(|record| decode::<RawCourseAssignment>(record, "assignment"))
        .map(|raw| from_course_assignment(raw, course))
        .collect()
}

fn decode<T: DeserializeOwned>(record: Value, label: &str) -> Option<T> {
    match serde_json::from_value(record) {
        Ok(item) => Some(item),
        Err(e) => {
            warn!("Skipping undecodable {label}: {e}");
            None
        }
    }
}

fn from_planner_item(raw: RawPlannerItem) -> NormalizedAssignment {
    let plannable = raw.plannable.as_ref();

    let title = plannable
        .and_then(|p| p.title.clone())
        .or_else(|| raw.plannable_type.clone())
        .unwrap_or_default();

    let due_at = plannable
        .and_then(|p| p.due_at.as_deref())
        .or(raw.plannable_date.as_deref())
        .and_then(parse_timestamp);

    let marked_complete = raw
        .planner_override
        .as_ref()
        .is_some_and(|o| o.marked_complete);
    let submitted = raw
        .submissions
        .get("submitted")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    NormalizedAssignment {
        id: id_string(&raw.plannable_id),
        title,
        due_at,
        completed: marked_complete || submitted,
        course_id: raw.course_id,
        course_name: raw.context_name,
        url: raw.html_url,
        points_possible: plannable.and_then(|p| p.points_possible),
        source: AssignmentSource::PlannerItem,
    }
}

fn from_course_assignment(raw: RawCourseAssignment, course: &Course) -> NormalizedAssignment {
    let completed = raw.submission.as_ref().is_some_and(|s| {
        s.submitted_at.is_some()
            || s
                .workflow_state
                .as_deref()
                .is_some_and(|state| COMPLETED_STATES.contains(&state))
    });

    NormalizedAssignment {
        id: id_string(&raw.id),
        title: raw.name.unwrap_or_default(),
        due_at: raw.due_at.as_deref().and_then(parse_timestamp),
        completed,
        course_id: raw.course_id.or(Some(course.id)),
        course_name: course.name.clone(),
        url: raw.html_url,
        points_possible: raw.points_possible,
        source: AssignmentSource::CourseAssignment,
    }
}

/// Canvas sends ids as numbers or strings depending on the endpoint
fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
