//! Configuration settings for Pugg.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub canvas: CanvasSettings,
    pub planner: PlannerSettings,
    pub llm: LlmSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.pugg".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Canvas API settings.
///
/// `base_url` and `token` are required; `pugg doctor` reports on them and
/// any command touching Canvas fails preflight without them. Both can be
/// supplied via the CANVAS_BASE_URL and CANVAS_TOKEN environment variables,
/// which take precedence over the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CanvasSettings {
    /// Canvas instance base URL (e.g., https://school.instructure.com).
    pub base_url: String,
    /// Canvas API access token.
    pub token: String,
}

/// Study planner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Default lookahead window for upcoming assignments, in days.
    pub days_ahead_default: u32,
    /// IANA timezone label used when the agent proposes timestamps.
    pub timezone: String,
    /// File recording fingerprints of calendar events already created.
    pub state_file: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            days_ahead_default: 7,
            timezone: "America/Los_Angeles".to_string(),
            state_file: "~/.pugg/created_events.json".to_string(),
        }
    }
}

/// LLM settings for the chat and agent commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name for chat completions.
    pub model: String,
    /// Override API base URL (for local or proxy endpoints). None = OpenAI default.
    pub base_url: Option<String>,
    /// Override API key. None = OPENAI_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Maximum tool-calling iterations per turn.
    pub max_tool_iterations: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            api_key: None,
            max_tool_iterations: 10,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment variables (CANVAS_BASE_URL, CANVAS_TOKEN, LM_BASE_URL,
    /// LM_API_KEY, LM_MODEL) override file values when set.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Apply environment variable overrides on top of file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CANVAS_BASE_URL") {
            if !url.is_empty() {
                self.canvas.base_url = url;
            }
        }
        if let Ok(token) = std::env::var("CANVAS_TOKEN") {
            if !token.is_empty() {
                self.canvas.token = token;
            }
        }
        if let Ok(url) = std::env::var("LM_BASE_URL") {
            if !url.is_empty() {
                self.llm.base_url = Some(url);
            }
        }
        if let Ok(key) = std::env::var("LM_API_KEY") {
            if !key.is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("LM_MODEL") {
            if !model.is_empty() {
                self.llm.model = model;
            }
        }
    }

    /// Validate that required Canvas settings are present.
    pub fn validate_canvas(&self) -> crate::error::Result<()> {
        if self.canvas.base_url.is_empty() {
            return Err(crate::error::PuggError::Config(
                "canvas.base_url is not set. Set it in the config file or export CANVAS_BASE_URL."
                    .to_string(),
            ));
        }
        if self.canvas.token.is_empty() {
            return Err(crate::error::PuggError::Config(
                "canvas.token is not set. Set it in the config file or export CANVAS_TOKEN."
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PuggError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pugg")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded seen-event state file path.
    pub fn state_file(&self) -> PathBuf {
        Self::expand_path(&self.planner.state_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.planner.days_ahead_default, 7);
        assert!(settings.canvas.base_url.is_empty());
        assert_eq!(settings.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_validate_canvas_requires_token() {
        let mut settings = Settings::default();
        settings.canvas.base_url = "https://school.instructure.com".to_string();
        assert!(settings.validate_canvas().is_err());

        settings.canvas.token = "abc123".to_string();
        assert!(settings.validate_canvas().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [planner]
            days_ahead_default = 14
            "#,
        )
        .unwrap();
        assert_eq!(settings.planner.days_ahead_default, 14);
        assert_eq!(settings.planner.timezone, "America/Los_Angeles");
    }
}
