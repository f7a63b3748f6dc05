//! Error types for Pugg.

use thiserror::Error;

/// Library-level error type for Pugg operations.
#[derive(Error, Debug)]
pub enum PuggError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Canvas request failed: {status} for {path}")]
    CanvasRequest { status: u16, path: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Pugg operations.
pub type Result<T> = std::result::Result<T, PuggError>;
