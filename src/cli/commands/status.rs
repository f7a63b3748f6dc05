//! Status command - show submission state for one assignment.

use super::build_tool_context;
use crate::agent::ToolCall;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the status command.
pub async fn run_status(course_id: u64, assignment_id: u64, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Canvas, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'pugg doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let tools = build_tool_context(&settings)?;

    let spinner = Output::spinner("Fetching submission status...");
    let result = tools
        .execute(&ToolCall::GetSubmissionStatus {
            course_id,
            assignment_id,
        })
        .await;
    spinner.finish_and_clear();

    let result = match result {
        Ok(json) => json,
        Err(e) => {
            Output::error(&format!("Failed to fetch submission: {}", e));
            return Err(e.into());
        }
    };

    let status: serde_json::Value = serde_json::from_str(&result)?;

    Output::header(&format!(
        "Submission for assignment {} (course {})",
        assignment_id, course_id
    ));
    Output::kv(
        "state",
        status["workflow_state"].as_str().unwrap_or("unknown"),
    );
    Output::kv(
        "submitted at",
        status["submitted_at"].as_str().unwrap_or("never"),
    );
    Output::kv(
        "graded at",
        status["graded_at"].as_str().unwrap_or("not graded"),
    );
    if let Some(score) = status["score"].as_f64() {
        Output::kv("score", &format!("{}", score));
    }
    if status["late"].as_bool() == Some(true) {
        Output::warning("This submission is late.");
    }
    if status["missing"].as_bool() == Some(true) {
        Output::warning("This submission is missing.");
    }
    println!();

    Ok(())
}
