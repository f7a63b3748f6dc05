//! Serde models for Canvas API responses and their tool-facing projections.

use serde::{Deserialize, Serialize};

/// The authenticated user, from `/api/v1/users/self`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
}

/// A course enrollment, from `/api/v1/courses`.
#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub id: Option<u64>,
    pub name: Option<String>,
}

impl Course {
    /// Display name, falling back to the course id when Canvas omits the name.
    pub fn display_name(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("Course {}", id),
            (None, None) => "Course".to_string(),
        }
    }
}

/// An assignment, from `/api/v1/courses/{id}/assignments`.
///
/// `due_at` is kept as the raw string Canvas returned; parsing happens at
/// projection time so unparseable values can be skipped per item.
#[derive(Debug, Clone, Deserialize)]
pub struct Assignment {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub due_at: Option<String>,
    pub points_possible: Option<f64>,
    #[serde(default)]
    pub submission_types: Vec<String>,
    pub html_url: Option<String>,
}

/// A submission, from `/api/v1/courses/{c}/assignments/{a}/submissions/self`.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub late: Option<bool>,
    pub missing: Option<bool>,
    pub submitted_at: Option<String>,
    pub graded_at: Option<String>,
    pub workflow_state: Option<String>,
    pub score: Option<f64>,
}

/// Read-only projection of an assignment returned by the listing tool.
///
/// Constructed per query and discarded after serialization.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentSummary {
    pub course_name: String,
    pub name: Option<String>,
    /// Due timestamp in RFC 3339, offset preserved from the Canvas response.
    pub due_at: String,
    pub points_possible: Option<f64>,
    pub submission_types: Vec<String>,
    pub html_url: Option<String>,
    pub summary_line: String,
    pub course_id: u64,
    pub assignment_id: Option<u64>,
}

impl AssignmentSummary {
    /// Project an assignment with an already-parsed due timestamp.
    pub fn new(course_id: u64, course_name: &str, assignment: &Assignment, due_iso: String) -> Self {
        let summary_line = format!(
            "**{}** — {} — Due: {}",
            course_name,
            assignment.name.as_deref().unwrap_or(""),
            due_iso
        );
        Self {
            course_name: course_name.to_string(),
            name: assignment.name.clone(),
            due_at: due_iso,
            points_possible: assignment.points_possible,
            submission_types: assignment.submission_types.clone(),
            html_url: assignment.html_url.clone(),
            summary_line,
            course_id,
            assignment_id: assignment.id,
        }
    }
}

/// Read-only projection of a submission returned by the status tool.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatus {
    pub late: Option<bool>,
    pub missing: Option<bool>,
    pub submitted_at: Option<String>,
    pub graded_at: Option<String>,
    pub workflow_state: Option<String>,
    pub score: Option<f64>,
}

impl From<Submission> for SubmissionStatus {
    fn from(sub: Submission) -> Self {
        Self {
            late: sub.late,
            missing: sub.missing,
            submitted_at: sub.submitted_at,
            graded_at: sub.graded_at,
            workflow_state: sub.workflow_state,
            score: sub.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_display_name_fallback() {
        let course = Course {
            id: Some(42),
            name: None,
        };
        assert_eq!(course.display_name(), "Course 42");

        let named = Course {
            id: Some(42),
            name: Some("Linear Algebra".to_string()),
        };
        assert_eq!(named.display_name(), "Linear Algebra");
    }

    #[test]
    fn test_assignment_deserializes_partial_response() {
        let assignment: Assignment = serde_json::from_str(
            r#"{"id": 7, "name": "Problem Set 3", "due_at": "2025-03-01T23:59:00Z"}"#,
        )
        .unwrap();
        assert_eq!(assignment.id, Some(7));
        assert!(assignment.submission_types.is_empty());
        assert!(assignment.points_possible.is_none());
    }

    #[test]
    fn test_summary_line_format() {
        let assignment = Assignment {
            id: Some(7),
            name: Some("Problem Set 3".to_string()),
            due_at: Some("2025-03-01T23:59:00Z".to_string()),
            points_possible: Some(100.0),
            submission_types: vec!["online_upload".to_string()],
            html_url: None,
        };
        let summary = AssignmentSummary::new(
            12,
            "Linear Algebra",
            &assignment,
            "2025-03-01T23:59:00+00:00".to_string(),
        );
        assert_eq!(
            summary.summary_line,
            "**Linear Algebra** — Problem Set 3 — Due: 2025-03-01T23:59:00+00:00"
        );
        assert_eq!(summary.course_id, 12);
    }
}
