//! Pugg - Canvas Study Planner
//!
//! A conversational CLI assistant for tracking Canvas coursework and scheduling study time.
//!
//! The name "Pugg" comes from the Norwegian word "pugge," to cram for an exam.
//!
//! # Overview
//!
//! Pugg allows you to:
//! - List upcoming Canvas assignments within a chosen window
//! - Check your submission status for a specific assignment
//! - Block out study time on your Canvas calendar, without duplicate events
//! - Chat with an LLM that drives the above through tool calls
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `canvas` - Canvas API client and response models
//! - `dedupe` - Event fingerprinting and the seen-event store
//! - `agent` - Tool definitions, dispatch, and the agent loop
//! - `openai` - LLM client construction
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pugg::agent::ToolContext;
//! use pugg::canvas::CanvasClient;
//! use pugg::config::Settings;
//! use pugg::dedupe::FileSeenStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let canvas = Arc::new(CanvasClient::new(&settings.canvas)?);
//!     let store = Arc::new(FileSeenStore::new(settings.state_file()));
//!     let tools = ToolContext::new(canvas, store, settings.planner.days_ahead_default);
//!
//!     let result = tools.dispatch("get_upcoming_assignments", r#"{"days_ahead": 7}"#).await?;
//!     println!("{}", result);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod openai;

pub use error::{PuggError, Result};
