//! Doctor command - verify configuration and local state.

use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Pugg Doctor");
    println!();
    println!("Checking configuration and local state...\n");

    let mut checks = Vec::new();

    // Canvas access
    println!("{}", style("Canvas").bold());
    let canvas_checks = check_canvas(settings);
    for check in &canvas_checks {
        check.print();
    }
    checks.extend(canvas_checks);

    println!();

    // LLM access
    println!("{}", style("LLM").bold());
    let llm_check = check_llm(settings);
    llm_check.print();
    checks.push(llm_check);

    println!();

    // Local state
    println!("{}", style("Local State").bold());
    let state_checks = check_local_state(settings);
    for check in &state_checks {
        check.print();
    }
    checks.extend(state_checks);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Pugg.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Pugg is ready to use.");
    }

    Ok(())
}

/// Check Canvas base URL and token.
fn check_canvas(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    if settings.canvas.base_url.is_empty() {
        results.push(CheckResult::error(
            "Base URL",
            "not set",
            "Set canvas.base_url in the config file or export CANVAS_BASE_URL",
        ));
    } else {
        results.push(CheckResult::ok("Base URL", &settings.canvas.base_url));
    }

    let token = &settings.canvas.token;
    if token.is_empty() {
        results.push(CheckResult::error(
            "Access token",
            "not set",
            "Set canvas.token in the config file or export CANVAS_TOKEN",
        ));
    } else if token.len() > 8 {
        let masked = format!("{}...{}", &token[..4], &token[token.len() - 4..]);
        results.push(CheckResult::ok("Access token", &format!("configured ({})", masked)));
    } else {
        results.push(CheckResult::warning(
            "Access token",
            "set but unusually short",
            "Canvas access tokens are typically 60+ characters",
        ));
    }

    results
}

/// Check that some LLM API key is available.
fn check_llm(settings: &Settings) -> CheckResult {
    let from_config = settings.llm.api_key.as_ref().is_some_and(|k| !k.is_empty());
    let from_env = std::env::var("OPENAI_API_KEY").map(|k| !k.is_empty()).unwrap_or(false);

    if from_config {
        CheckResult::ok("API key", &format!("from config (model: {})", settings.llm.model))
    } else if from_env {
        CheckResult::ok(
            "API key",
            &format!("from OPENAI_API_KEY (model: {})", settings.llm.model),
        )
    } else {
        CheckResult::warning(
            "API key",
            "not set",
            "Only needed for 'chat' and 'agent'. Set with: export OPENAI_API_KEY='sk-...'",
        )
    }
}

/// Check data directory, state file, and config file.
fn check_local_state(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let data_dir = settings.data_dir();
    if data_dir.exists() {
        results.push(CheckResult::ok("Data directory", &format!("{}", data_dir.display())));
    } else {
        results.push(CheckResult::warning(
            "Data directory",
            &format!("{} (will be created)", data_dir.display()),
            "Directory will be created on first use",
        ));
    }

    let state_file = settings.state_file();
    if state_file.exists() {
        let count = std::fs::read_to_string(&state_file)
            .ok()
            .and_then(|c| serde_json::from_str::<Vec<String>>(&c).ok())
            .map(|v| v.len());
        match count {
            Some(n) => results.push(CheckResult::ok(
                "Event record",
                &format!("{} ({} event(s) recorded)", state_file.display(), n),
            )),
            None => results.push(CheckResult::error(
                "Event record",
                &format!("{} is not a valid JSON array", state_file.display()),
                "Delete the file to reset duplicate suppression (events may be recreated)",
            )),
        }
    } else {
        results.push(CheckResult::warning(
            "Event record",
            &format!("{} (not created yet)", state_file.display()),
            "Created when the first calendar event is scheduled",
        ));
    }

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        results.push(CheckResult::ok("Config file", &format!("{}", config_path.display())));
    } else {
        results.push(CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: pugg init (or pugg config edit)",
        ));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_canvas_reports_missing_config() {
        let settings = Settings::default();
        let results = check_canvas(&settings);
        assert!(results.iter().all(|r| r.status == CheckStatus::Error));
    }

    #[test]
    fn test_check_canvas_masks_token() {
        let mut settings = Settings::default();
        settings.canvas.base_url = "https://school.instructure.com".to_string();
        settings.canvas.token = "0123456789abcdef".to_string();
        let results = check_canvas(&settings);
        assert_eq!(results[1].status, CheckStatus::Ok);
        assert!(results[1].message.contains("0123...cdef"));
        assert!(!results[1].message.contains("0123456789abcdef"));
    }
}
