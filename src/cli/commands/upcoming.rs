//! Upcoming command - list assignments due within a window.

use super::build_tool_context;
use crate::agent::ToolCall;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the upcoming command.
pub async fn run_upcoming(days: Option<u32>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Canvas, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'pugg doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let tools = build_tool_context(&settings)?;
    let window = days.unwrap_or(settings.planner.days_ahead_default);

    let spinner = Output::spinner("Fetching upcoming assignments...");
    let result = tools
        .execute(&ToolCall::GetUpcomingAssignments { days_ahead: days })
        .await;
    spinner.finish_and_clear();

    let result = match result {
        Ok(json) => json,
        Err(e) => {
            Output::error(&format!("Failed to fetch assignments: {}", e));
            return Err(e.into());
        }
    };

    let parsed: serde_json::Value = serde_json::from_str(&result)?;
    let assignments = parsed["assignments"].as_array().cloned().unwrap_or_default();

    if assignments.is_empty() {
        Output::info(&format!("No assignments due in the next {} days.", window));
        return Ok(());
    }

    Output::header(&format!(
        "Assignments due in the next {} days ({})",
        window,
        assignments.len()
    ));
    for a in &assignments {
        Output::assignment(
            a["course_name"].as_str().unwrap_or(""),
            a["name"].as_str().unwrap_or("(unnamed)"),
            a["due_at"].as_str().unwrap_or(""),
        );
        if let Some(url) = a["html_url"].as_str() {
            Output::kv("url", url);
        }
    }
    println!();

    Ok(())
}
