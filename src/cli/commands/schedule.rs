//! Schedule command - create one study event on the Canvas calendar.

use super::build_tool_context;
use crate::agent::ToolCall;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the schedule command.
pub async fn run_schedule(
    title: &str,
    start_at: &str,
    end_at: &str,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Canvas, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'pugg doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let tools = build_tool_context(&settings)?;

    let spinner = Output::spinner("Creating calendar event...");
    let result = tools
        .execute(&ToolCall::CreateCanvasEvent {
            title: title.to_string(),
            start_at: start_at.to_string(),
            end_at: end_at.to_string(),
        })
        .await;
    spinner.finish_and_clear();

    let result = match result {
        Ok(json) => json,
        Err(e) => {
            Output::error(&format!("Failed to create event: {}", e));
            return Err(e.into());
        }
    };

    let parsed: serde_json::Value = serde_json::from_str(&result)?;

    if parsed["skipped"].as_bool() == Some(true) {
        Output::info(&format!(
            "An identical event already exists, nothing created: {}",
            title
        ));
        return Ok(());
    }

    let created = &parsed["created"][0];
    Output::success(&format!("Created event: {}", title));
    Output::kv("start", created["start_at"].as_str().unwrap_or(start_at));
    Output::kv("end", created["end_at"].as_str().unwrap_or(end_at));
    if let Some(id) = created["id"].as_u64() {
        Output::kv("id", &id.to_string());
    }
    println!();

    Ok(())
}
