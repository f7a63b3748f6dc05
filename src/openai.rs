//! OpenAI client configuration with sensible defaults.

use crate::config::LlmSettings;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for LLM API requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create a chat completions client from the LLM settings.
///
/// Honors `base_url` and `api_key` overrides for local or proxied endpoints;
/// otherwise async-openai falls back to the OPENAI_API_KEY environment variable.
pub fn create_client(settings: &LlmSettings) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    let mut config = OpenAIConfig::default();
    if let Some(base_url) = &settings.base_url {
        config = config.with_api_base(base_url);
    }
    if let Some(api_key) = &settings.api_key {
        config = config.with_api_key(api_key);
    }

    Client::with_config(config).with_http_client(http_client)
}
