//! Pre-flight checks before operations that need external services.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{PuggError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Canvas reads/writes require base URL and token.
    Canvas,
    /// Chat and agent require Canvas access plus LLM credentials.
    Chat,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Canvas => {
            settings.validate_canvas()?;
        }
        Operation::Chat => {
            settings.validate_canvas()?;
            check_llm_key(settings)?;
        }
    }
    Ok(())
}

/// Check that an LLM API key is available from config or environment.
fn check_llm_key(settings: &Settings) -> Result<()> {
    if settings.llm.api_key.as_ref().is_some_and(|k| !k.is_empty()) {
        return Ok(());
    }
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        _ => Err(PuggError::Config(
            "No LLM API key found. Set llm.api_key in the config file, or export \
             OPENAI_API_KEY (or LM_API_KEY for a custom endpoint)."
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_check_fails_without_token() {
        let settings = Settings::default();
        assert!(check(Operation::Canvas, &settings).is_err());
    }

    #[test]
    fn test_chat_check_accepts_config_api_key() {
        let mut settings = Settings::default();
        settings.canvas.base_url = "https://school.instructure.com".to_string();
        settings.canvas.token = "abc123".to_string();
        settings.llm.api_key = Some("sk-test".to_string());
        assert!(check(Operation::Chat, &settings).is_ok());
    }
}
