//! Tool definitions, dispatch, and implementations for the agent system.

use crate::canvas::{Assignment, AssignmentSummary, CanvasApi, Course, Submission, SubmissionStatus, User};
use crate::dedupe::{fingerprint, SeenStore};
use crate::error::{PuggError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Bounds on the assignment lookahead window, in days.
pub const MIN_DAYS_AHEAD: u32 = 1;
pub const MAX_DAYS_AHEAD: u32 = 60;

/// Location label attached to every created study event.
const EVENT_LOCATION: &str = "Study";

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// List assignments due within the next N days.
    GetUpcomingAssignments { days_ahead: Option<u32> },

    /// Get the user's own submission state for one assignment.
    GetSubmissionStatus { course_id: u64, assignment_id: u64 },

    /// Create one study event on the user's Canvas calendar.
    CreateCanvasEvent {
        title: String,
        start_at: String,
        end_at: String,
    },
}

/// Normalize an ISO 8601 timestamp to its canonical textual form.
///
/// Rewrites the `+00:00` offset spelling to the `Z` suffix; all other offsets
/// are left as-is. Purely textual: two spellings of the same instant with
/// different non-UTC offsets remain distinct.
pub fn normalize_iso8601(s: &str) -> String {
    s.replace("+00:00", "Z")
}

/// Tool execution context with access to Canvas and the seen-event store.
pub struct ToolContext {
    pub canvas: Arc<dyn CanvasApi>,
    pub seen: Arc<dyn SeenStore>,
    pub days_ahead_default: u32,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(canvas: Arc<dyn CanvasApi>, seen: Arc<dyn SeenStore>, days_ahead_default: u32) -> Self {
        Self {
            canvas,
            seen,
            days_ahead_default,
        }
    }

    /// Dispatch a named tool call with JSON-encoded arguments.
    ///
    /// The sole entry point for model-issued tool calls. Unrecognized names
    /// yield an `{"error": ...}` payload rather than an error, so the
    /// conversation can continue; domain failures (Canvas errors, invalid
    /// input) propagate to the caller.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> Result<String> {
        if !matches!(
            name,
            "get_upcoming_assignments" | "get_submission_status" | "create_canvas_event"
        ) {
            return Ok(json!({ "error": format!("Unknown tool {}", name) }).to_string());
        }

        let tool = parse_tool_call(name, arguments)?;
        self.execute(&tool).await
    }

    /// Execute a tool call and return its result as a JSON string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::GetUpcomingAssignments { days_ahead } => {
                self.execute_upcoming_assignments(*days_ahead).await
            }
            ToolCall::GetSubmissionStatus {
                course_id,
                assignment_id,
            } => self.execute_submission_status(*course_id, *assignment_id).await,
            ToolCall::CreateCanvasEvent {
                title,
                start_at,
                end_at,
            } => self.execute_create_event(title, start_at, end_at).await,
        }
    }

    /// List assignments due within the lookahead window, sorted by due date.
    ///
    /// Assignments with a missing or unparseable due timestamp are excluded
    /// per item rather than failing the whole listing.
    async fn execute_upcoming_assignments(&self, days_ahead: Option<u32>) -> Result<String> {
        let days = days_ahead
            .unwrap_or(self.days_ahead_default)
            .clamp(MIN_DAYS_AHEAD, MAX_DAYS_AHEAD);
        info!("get_upcoming_assignments(days_ahead={})", days);

        let now = Utc::now();
        let horizon = now + chrono::Duration::days(days as i64);

        let courses: Vec<Course> = serde_json::from_value(
            self.canvas
                .get(
                    "/api/v1/courses",
                    &[
                        ("enrollment_state", "active".to_string()),
                        ("per_page", "100".to_string()),
                    ],
                )
                .await?,
        )?;

        let mut out: Vec<AssignmentSummary> = Vec::new();
        for course in courses {
            let Some(course_id) = course.id else { continue };
            let course_name = course.display_name();

            let assignments: Vec<Assignment> = serde_json::from_value(
                self.canvas
                    .get(
                        &format!("/api/v1/courses/{}/assignments", course_id),
                        &[
                            ("bucket", "upcoming".to_string()),
                            ("per_page", "100".to_string()),
                        ],
                    )
                    .await?,
            )?;

            for assignment in assignments {
                let Some(due_raw) = assignment.due_at.as_deref() else {
                    continue;
                };
                let Ok(due) = DateTime::parse_from_rfc3339(due_raw) else {
                    continue;
                };
                // Canvas's "upcoming" bucket already excludes past-due work;
                // the lower bound here keeps the listing correct regardless.
                let due_utc = due.with_timezone(&Utc);
                if due_utc >= now && due_utc <= horizon {
                    out.push(AssignmentSummary::new(
                        course_id,
                        &course_name,
                        &assignment,
                        due.to_rfc3339(),
                    ));
                }
            }
        }

        out.sort_by(|a, b| a.due_at.cmp(&b.due_at));
        info!("Found {} upcoming assignments", out.len());

        Ok(json!({ "assignments": out }).to_string())
    }

    /// Fetch the authenticated user's submission for one assignment.
    async fn execute_submission_status(&self, course_id: u64, assignment_id: u64) -> Result<String> {
        info!(
            "get_submission_status(course_id={}, assignment_id={})",
            course_id, assignment_id
        );

        let path = format!(
            "/api/v1/courses/{}/assignments/{}/submissions/self",
            course_id, assignment_id
        );
        let submission: Submission = serde_json::from_value(self.canvas.get(&path, &[]).await?)?;
        let status = SubmissionStatus::from(submission);

        Ok(serde_json::to_string(&status)?)
    }

    /// Create one event on the user's default Canvas calendar.
    ///
    /// For a fixed (title, start, end) triple, at most one Canvas-visible
    /// event is created across the lifetime of the seen-event store: the
    /// fingerprint is checked before the write and recorded after it. The
    /// check-then-act pair is not atomic against concurrent invocations.
    async fn execute_create_event(&self, title: &str, start_at: &str, end_at: &str) -> Result<String> {
        info!("create_canvas_event({})", title);

        if title.is_empty() || start_at.is_empty() || end_at.is_empty() {
            return Err(PuggError::InvalidInput(
                "title, start_at, and end_at are required".to_string(),
            ));
        }

        let start_at = normalize_iso8601(start_at);
        let end_at = normalize_iso8601(end_at);

        let me: User =
            serde_json::from_value(self.canvas.get("/api/v1/users/self", &[]).await?)?;
        let context_code = format!("user_{}", me.id);

        let hash = fingerprint(title, &start_at, &end_at);
        if self.seen.contains(&hash)? {
            info!("Skipping duplicate event: {}", title);
            return Ok(json!({ "created": [], "count": 0, "skipped": true }).to_string());
        }

        let payload = json!({
            "calendar_event": {
                "context_code": context_code,
                "title": title,
                "start_at": start_at,
                "end_at": end_at,
                "description": "",
                "location_name": EVENT_LOCATION,
            }
        });

        let created = self.canvas.post("/api/v1/calendar_events", &payload).await?;
        self.seen.insert(&hash)?;

        info!("Created 1 event");
        Ok(json!({
            "created": [{
                "id": created.get("id"),
                "title": title,
                "start_at": start_at,
                "end_at": end_at,
            }],
            "count": 1,
        })
        .to_string())
    }
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| PuggError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "get_upcoming_assignments" => {
            let days_ahead = args["days_ahead"].as_u64().map(|d| d as u32);
            Ok(ToolCall::GetUpcomingAssignments { days_ahead })
        }
        "get_submission_status" => {
            let course_id = args["course_id"]
                .as_u64()
                .ok_or_else(|| PuggError::Agent("Missing 'course_id' argument".to_string()))?;
            let assignment_id = args["assignment_id"]
                .as_u64()
                .ok_or_else(|| PuggError::Agent("Missing 'assignment_id' argument".to_string()))?;
            Ok(ToolCall::GetSubmissionStatus {
                course_id,
                assignment_id,
            })
        }
        "create_canvas_event" => {
            let title = args["title"]
                .as_str()
                .ok_or_else(|| PuggError::Agent("Missing 'title' argument".to_string()))?
                .to_string();
            let start_at = args["start_at"]
                .as_str()
                .ok_or_else(|| PuggError::Agent("Missing 'start_at' argument".to_string()))?
                .to_string();
            let end_at = args["end_at"]
                .as_str()
                .ok_or_else(|| PuggError::Agent("Missing 'end_at' argument".to_string()))?
                .to_string();
            Ok(ToolCall::CreateCanvasEvent {
                title,
                start_at,
                end_at,
            })
        }
        _ => Err(PuggError::Agent(format!("Unknown tool: {}", name))),
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "get_upcoming_assignments".to_string(),
                description: Some(
                    "List upcoming Canvas assignments due within the next N days.".to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "days_ahead": {
                            "type": "integer",
                            "description": "How many days ahead to look.",
                            "minimum": MIN_DAYS_AHEAD,
                            "maximum": MAX_DAYS_AHEAD
                        }
                    },
                    "required": [],
                    "additionalProperties": false
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "get_submission_status".to_string(),
                description: Some(
                    "Get the current user's submission status for a specific assignment."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "course_id": { "type": "integer" },
                        "assignment_id": { "type": "integer" }
                    },
                    "required": ["course_id", "assignment_id"],
                    "additionalProperties": false
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "create_canvas_event".to_string(),
                description: Some(
                    "Create ONE study event on the Canvas calendar. Requires title, \
                    start_at, end_at (ISO 8601 with timezone)."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "Event title"
                        },
                        "start_at": {
                            "type": "string",
                            "description": "Start time (ISO 8601, e.g. 2025-10-12T15:00:00-07:00)"
                        },
                        "end_at": {
                            "type": "string",
                            "description": "End time (ISO 8601, e.g. 2025-10-12T17:00:00-07:00)"
                        }
                    },
                    "required": ["title", "start_at", "end_at"],
                    "additionalProperties": false
                })),
                strict: None,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedupe::MemorySeenStore;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canvas stub serving canned GET responses and recording all calls.
    #[derive(Default)]
    struct MockCanvas {
        get_responses: HashMap<String, Value>,
        post_response: Value,
        get_calls: Mutex<Vec<String>>,
        post_calls: Mutex<Vec<(String, Value)>>,
        fail_status: Option<u16>,
    }

    #[async_trait]
    impl CanvasApi for MockCanvas {
        async fn get(&self, path: &str, _query: &[(&str, String)]) -> Result<Value> {
            self.get_calls.lock().unwrap().push(path.to_string());
            if let Some(status) = self.fail_status {
                return Err(PuggError::CanvasRequest {
                    status,
                    path: path.to_string(),
                });
            }
            self.get_responses
                .get(path)
                .cloned()
                .ok_or_else(|| PuggError::CanvasRequest {
                    status: 404,
                    path: path.to_string(),
                })
        }

        async fn post(&self, path: &str, body: &Value) -> Result<Value> {
            self.post_calls
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));
            Ok(self.post_response.clone())
        }
    }

    fn context(canvas: MockCanvas) -> (ToolContext, Arc<MockCanvas>) {
        let canvas = Arc::new(canvas);
        let ctx = ToolContext::new(canvas.clone(), Arc::new(MemorySeenStore::new()), 7);
        (ctx, canvas)
    }

    fn due_in_days(days: i64) -> String {
        (Utc::now() + chrono::Duration::days(days)).to_rfc3339()
    }

    #[tokio::test]
    async fn test_upcoming_filters_to_horizon_and_sorts() {
        let mut get_responses = HashMap::new();
        get_responses.insert(
            "/api/v1/courses".to_string(),
            serde_json::json!([{ "id": 1, "name": "Algebra" }]),
        );
        get_responses.insert(
            "/api/v1/courses/1/assignments".to_string(),
            serde_json::json!([
                { "id": 10, "name": "Yesterday", "due_at": due_in_days(-1) },
                { "id": 11, "name": "Next month", "due_at": due_in_days(40) },
                { "id": 12, "name": "This week", "due_at": due_in_days(5) },
                { "id": 13, "name": "No due date", "due_at": null },
                { "id": 14, "name": "Bad due date", "due_at": "not-a-date" },
                { "id": 15, "name": "Tomorrow", "due_at": due_in_days(1) }
            ]),
        );

        let (ctx, _) = context(MockCanvas {
            get_responses,
            ..Default::default()
        });

        let result = ctx
            .execute(&ToolCall::GetUpcomingAssignments {
                days_ahead: Some(7),
            })
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        let assignments = parsed["assignments"].as_array().unwrap();

        // Past-due, null, unparseable, and beyond-horizon items are all
        // excluded; survivors come back sorted ascending by due date.
        let names: Vec<&str> = assignments
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Tomorrow", "This week"]);
        assert_eq!(assignments[1]["course_name"], "Algebra");
        assert!(assignments[1]["summary_line"]
            .as_str()
            .unwrap()
            .starts_with("**Algebra** — This week — Due: "));
    }

    #[tokio::test]
    async fn test_upcoming_uses_default_window() {
        let mut get_responses = HashMap::new();
        get_responses.insert(
            "/api/v1/courses".to_string(),
            serde_json::json!([{ "id": 1, "name": "Algebra" }]),
        );
        get_responses.insert(
            "/api/v1/courses/1/assignments".to_string(),
            serde_json::json!([
                { "id": 10, "name": "In range", "due_at": due_in_days(5) },
                { "id": 11, "name": "Out of range", "due_at": due_in_days(10) }
            ]),
        );

        // days_ahead absent: falls back to the configured default of 7.
        let (ctx, _) = context(MockCanvas {
            get_responses,
            ..Default::default()
        });
        let result = ctx
            .execute(&ToolCall::GetUpcomingAssignments { days_ahead: None })
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["assignments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submission_status_projection() {
        let mut get_responses = HashMap::new();
        get_responses.insert(
            "/api/v1/courses/1/assignments/10/submissions/self".to_string(),
            serde_json::json!({
                "late": false,
                "missing": false,
                "submitted_at": "2025-02-20T10:00:00Z",
                "graded_at": null,
                "workflow_state": "submitted",
                "score": null,
                "attempt": 1
            }),
        );

        let (ctx, _) = context(MockCanvas {
            get_responses,
            ..Default::default()
        });
        let result = ctx
            .execute(&ToolCall::GetSubmissionStatus {
                course_id: 1,
                assignment_id: 10,
            })
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["workflow_state"], "submitted");
        assert_eq!(parsed["late"], false);
        assert!(parsed["score"].is_null());
        // Extraneous backend fields are not forwarded.
        assert!(parsed.get("attempt").is_none());
    }

    #[tokio::test]
    async fn test_create_event_is_idempotent() {
        let mut get_responses = HashMap::new();
        get_responses.insert(
            "/api/v1/users/self".to_string(),
            serde_json::json!({ "id": 9, "name": "Student" }),
        );

        let (ctx, canvas) = context(MockCanvas {
            get_responses,
            post_response: serde_json::json!({ "id": 1234 }),
            ..Default::default()
        });

        let call = ToolCall::CreateCanvasEvent {
            title: "Study: Algebra".to_string(),
            start_at: "2025-03-01T15:00:00Z".to_string(),
            end_at: "2025-03-01T17:00:00Z".to_string(),
        };

        let first: Value = serde_json::from_str(&ctx.execute(&call).await.unwrap()).unwrap();
        assert_eq!(first["count"], 1);
        assert_eq!(first["created"][0]["id"], 1234);
        assert_eq!(first["created"][0]["title"], "Study: Algebra");

        let second: Value = serde_json::from_str(&ctx.execute(&call).await.unwrap()).unwrap();
        assert_eq!(second["count"], 0);
        assert_eq!(second["skipped"], true);
        assert!(second["created"].as_array().unwrap().is_empty());

        // Exactly one Canvas write across both invocations.
        let posts = canvas.post_calls.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "/api/v1/calendar_events");
        assert_eq!(posts[0].1["calendar_event"]["context_code"], "user_9");
        assert_eq!(posts[0].1["calendar_event"]["location_name"], "Study");
    }

    #[tokio::test]
    async fn test_create_event_normalizes_utc_offset_before_fingerprinting() {
        let mut get_responses = HashMap::new();
        get_responses.insert(
            "/api/v1/users/self".to_string(),
            serde_json::json!({ "id": 9 }),
        );

        let (ctx, canvas) = context(MockCanvas {
            get_responses,
            post_response: serde_json::json!({ "id": 1 }),
            ..Default::default()
        });

        let with_offset = ToolCall::CreateCanvasEvent {
            title: "Study".to_string(),
            start_at: "2025-03-01T15:00:00+00:00".to_string(),
            end_at: "2025-03-01T17:00:00+00:00".to_string(),
        };
        let with_z = ToolCall::CreateCanvasEvent {
            title: "Study".to_string(),
            start_at: "2025-03-01T15:00:00Z".to_string(),
            end_at: "2025-03-01T17:00:00Z".to_string(),
        };

        ctx.execute(&with_offset).await.unwrap();
        let second: Value =
            serde_json::from_str(&ctx.execute(&with_z).await.unwrap()).unwrap();
        assert_eq!(second["skipped"], true);
        assert_eq!(canvas.post_calls.lock().unwrap().len(), 1);

        // The normalized form is what went to Canvas.
        let posts = canvas.post_calls.lock().unwrap();
        assert_eq!(
            posts[0].1["calendar_event"]["start_at"],
            "2025-03-01T15:00:00Z"
        );
    }

    #[tokio::test]
    async fn test_create_event_rejects_empty_input_without_network() {
        let (ctx, canvas) = context(MockCanvas::default());

        let result = ctx
            .execute(&ToolCall::CreateCanvasEvent {
                title: String::new(),
                start_at: "2025-01-01T00:00:00Z".to_string(),
                end_at: "2025-01-01T01:00:00Z".to_string(),
            })
            .await;

        assert!(matches!(result, Err(PuggError::InvalidInput(_))));
        assert!(canvas.get_calls.lock().unwrap().is_empty());
        assert!(canvas.post_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_returns_payload() {
        let (ctx, _) = context(MockCanvas::default());

        let result = ctx.dispatch("delete_everything", "{}").await.unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["error"], "Unknown tool delete_everything");
    }

    #[tokio::test]
    async fn test_canvas_failure_propagates_with_status_and_path() {
        let (ctx, _) = context(MockCanvas {
            fail_status: Some(500),
            ..Default::default()
        });

        let result = ctx
            .execute(&ToolCall::GetUpcomingAssignments {
                days_ahead: Some(7),
            })
            .await;

        match result {
            Err(PuggError::CanvasRequest { status, path }) => {
                assert_eq!(status, 500);
                assert_eq!(path, "/api/v1/courses");
            }
            other => panic!("Expected CanvasRequest error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parse_upcoming_assignments_tool() {
        let tool = parse_tool_call("get_upcoming_assignments", r#"{"days_ahead": 14}"#).unwrap();
        match tool {
            ToolCall::GetUpcomingAssignments { days_ahead } => {
                assert_eq!(days_ahead, Some(14));
            }
            _ => panic!("Expected GetUpcomingAssignments tool"),
        }

        let tool = parse_tool_call("get_upcoming_assignments", "{}").unwrap();
        assert!(matches!(
            tool,
            ToolCall::GetUpcomingAssignments { days_ahead: None }
        ));
    }

    #[test]
    fn test_parse_submission_status_requires_ids() {
        let tool =
            parse_tool_call("get_submission_status", r#"{"course_id": 1, "assignment_id": 2}"#)
                .unwrap();
        match tool {
            ToolCall::GetSubmissionStatus {
                course_id,
                assignment_id,
            } => {
                assert_eq!(course_id, 1);
                assert_eq!(assignment_id, 2);
            }
            _ => panic!("Expected GetSubmissionStatus tool"),
        }

        let err = parse_tool_call("get_submission_status", r#"{"course_id": 1}"#);
        assert!(matches!(err, Err(PuggError::Agent(_))));
    }

    #[test]
    fn test_parse_invalid_arguments_json() {
        let err = parse_tool_call("get_upcoming_assignments", "not json");
        assert!(matches!(err, Err(PuggError::Agent(_))));
    }

    #[test]
    fn test_normalize_iso8601() {
        assert_eq!(
            normalize_iso8601("2025-03-01T15:00:00+00:00"),
            "2025-03-01T15:00:00Z"
        );
        assert_eq!(normalize_iso8601("2025-03-01T15:00:00Z"), "2025-03-01T15:00:00Z");
        assert_eq!(
            normalize_iso8601("2025-03-01T15:00:00-07:00"),
            "2025-03-01T15:00:00-07:00"
        );
    }
}
