//! Agent runner with tool calling loop.

use super::tools::{tool_definitions, ToolContext};
use crate::config::{LlmSettings, PlannerSettings};
use crate::error::{PuggError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use tracing::{debug, info};

/// Build the system prompt for the study-planning agent.
///
/// Interpolates the configured timezone and default lookahead window so the
/// model proposes sensible windows and correctly-zoned timestamps.
pub fn default_system_prompt(planner: &PlannerSettings) -> String {
    format!(
        r#"You can call tools to help plan study time for Canvas assignments.

TOOLS YOU CAN CALL:
- get_upcoming_assignments(days_ahead)
- get_submission_status(course_id, assignment_id)
- create_canvas_event(title, start_at, end_at)

Instructions:
1) When asked about upcoming assignments, call get_upcoming_assignments with a sensible window (default {} days).
2) After a tool result (JSON), summarize clearly:
- If there are assignments: list each as "Course — Assignment — Due (ISO)".
- If none: say there are none in that window.
3) Offer to adjust the window (e.g., 1, 7, or 21 days).
4) If the user asks to schedule study time, propose events and then call create_canvas_event.
5) Use timezone {} when proposing ISO timestamps.

Be concise."#,
        planner.days_ahead_default, planner.timezone
    )
}

/// Agent that plans study time through Canvas tool calls.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    tools: ToolContext,
    max_iterations: usize,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent with the given tool context and model.
    pub fn new(tools: ToolContext, model: &str, llm: &LlmSettings, planner: &PlannerSettings) -> Self {
        Self {
            client: create_client(llm),
            model: model.to_string(),
            tools,
            max_iterations: llm.max_tool_iterations,
            system_prompt: default_system_prompt(planner),
        }
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Run the agent with a user task.
    pub async fn run(&self, task: &str) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| PuggError::Agent(e.to_string()))?
                .into(),
        ];

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(task.to_string())
                .build()
                .map_err(|e| PuggError::Agent(e.to_string()))?
                .into(),
        );

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(PuggError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            // Call LLM with tools
            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(tool_definitions())
                .build()
                .map_err(|e| PuggError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| PuggError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| PuggError::Agent("No response from model".to_string()))?;

            // Check if LLM wants to call tools
            if let Some(ref tool_calls) = choice.message.tool_calls {
                if tool_calls.is_empty() {
                    // No tool calls, treat as final response
                    return self.build_response(&choice.message.content, tool_calls_made, iterations);
                }

                // Add assistant message with tool calls to history
                let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(tool_calls.clone())
                    .build()
                    .map_err(|e| PuggError::Agent(e.to_string()))?;
                messages.push(assistant_msg.into());

                // Execute each tool call
                for tool_call in tool_calls {
                    let record = self.execute_tool_call(tool_call).await;

                    // Add tool result to messages
                    let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&tool_call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| PuggError::Agent(e.to_string()))?;
                    messages.push(tool_msg.into());

                    tool_calls_made.push(record);
                }
            } else {
                // No tool calls - LLM is done, return final response
                return self.build_response(&choice.message.content, tool_calls_made, iterations);
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Domain failures are rendered into the result text so the model can
    /// explain them to the user instead of ending the turn.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match self.tools.dispatch(name, arguments).await {
            Ok(output) => output,
            Err(e) => format!("Tool error: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }

    /// Build the final agent response.
    fn build_response(
        &self,
        content: &Option<String>,
        tool_calls: Vec<ToolCallRecord>,
        iterations: usize,
    ) -> Result<AgentResponse> {
        let content = content.clone().unwrap_or_default();

        Ok(AgentResponse {
            content,
            tool_calls,
            iterations,
        })
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "get_upcoming_assignments".to_string(),
            arguments: r#"{"days_ahead": 7}"#.to_string(),
            result: "{\"assignments\": []}".to_string(),
        };
        assert_eq!(
            format!("{}", record),
            r#"get_upcoming_assignments({"days_ahead": 7})"#
        );
    }

    #[test]
    fn test_system_prompt_interpolation() {
        let planner = PlannerSettings {
            days_ahead_default: 14,
            timezone: "Europe/Oslo".to_string(),
            ..Default::default()
        };
        let prompt = default_system_prompt(&planner);
        assert!(prompt.contains("default 14 days"));
        assert!(prompt.contains("Europe/Oslo"));
    }
}
