//! Agent system for Pugg.
//!
//! Tool definitions, dispatch, and the LLM tool-calling loop.

mod runner;
mod tools;

pub use runner::{default_system_prompt, Agent, AgentResponse, ToolCallRecord};
pub use tools::{
    normalize_iso8601, parse_tool_call, tool_definitions, ToolCall, ToolContext, MAX_DAYS_AHEAD,
    MIN_DAYS_AHEAD,
};
