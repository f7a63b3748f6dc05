//! Agent command implementation.

use super::build_tool_context;
use crate::agent::Agent;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the agent command.
pub async fn run_agent(task: &str, model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Chat, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'pugg doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let tools = build_tool_context(&settings)?;
    let model = model.unwrap_or_else(|| settings.llm.model.clone());

    let agent = Agent::new(tools, &model, &settings.llm, &settings.planner);

    let spinner = Output::spinner("Agent working...");

    match agent.run(task).await {
        Ok(response) => {
            spinner.finish_and_clear();

            // Show the agent's response
            println!("\n{}\n", response.content);

            // Show tool calls summary
            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            Output::info(&format!(
                "Completed in {} iteration(s)",
                response.iterations
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
