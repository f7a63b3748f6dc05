//! CLI module for Pugg.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Pugg - Canvas Study Planner
///
/// A conversational CLI assistant for tracking Canvas coursework and scheduling
/// study time. The name "Pugg" comes from the Norwegian word "pugge," to cram
/// for an exam.
#[derive(Parser, Debug)]
#[command(name = "pugg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Pugg and verify configuration
    Init,

    /// Check configuration and connectivity requirements
    Doctor,

    /// List upcoming assignments within a lookahead window
    Upcoming {
        /// How many days ahead to look (1-60, default from config)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Show your submission status for a specific assignment
    Status {
        /// Canvas course ID
        course_id: u64,

        /// Canvas assignment ID
        assignment_id: u64,
    },

    /// Create a study event on your Canvas calendar
    Schedule {
        /// Event title
        title: String,

        /// Start time (ISO 8601 with offset, e.g. 2025-10-12T15:00:00-07:00)
        start_at: String,

        /// End time (ISO 8601 with offset)
        end_at: String,
    },

    /// Start an interactive chat session with the study planner
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Run a one-shot agent task (e.g., "plan study time for this week")
    Agent {
        /// The task for the agent to perform
        task: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
