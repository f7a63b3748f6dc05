//! CLI command implementations.

mod agent;
mod chat;
mod config;
mod doctor;
mod init;
mod schedule;
mod status;
mod upcoming;

pub use agent::run_agent;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use init::run_init;
pub use schedule::run_schedule;
pub use status::run_status;
pub use upcoming::run_upcoming;

use crate::agent::ToolContext;
use crate::canvas::CanvasClient;
use crate::config::Settings;
use crate::dedupe::FileSeenStore;
use std::sync::Arc;

/// Build the tool context shared by all Canvas-backed commands.
pub(crate) fn build_tool_context(settings: &Settings) -> crate::error::Result<ToolContext> {
    let canvas = Arc::new(CanvasClient::new(&settings.canvas)?);
    let store = Arc::new(FileSeenStore::new(settings.state_file()));
    Ok(ToolContext::new(
        canvas,
        store,
        settings.planner.days_ahead_default,
    ))
}
