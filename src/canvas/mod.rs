//! Canvas API access for Pugg.
//!
//! Provides a trait-based interface over the Canvas REST API so tool logic
//! can be exercised against a mock in tests.

mod client;
mod models;

pub use client::CanvasClient;
pub use models::{Assignment, AssignmentSummary, Course, Submission, SubmissionStatus, User};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for Canvas API implementations.
///
/// Both methods return the parsed JSON body. A non-success HTTP status maps
/// to `PuggError::CanvasRequest` carrying the status code and request path;
/// no retries are attempted.
#[async_trait]
pub trait CanvasApi: Send + Sync {
    /// Issue a GET request against the Canvas API.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;

    /// Issue a POST request with a JSON body against the Canvas API.
    async fn post(&self, path: &str, body: &Value) -> Result<Value>;
}
