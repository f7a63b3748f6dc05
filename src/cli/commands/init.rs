//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Pugg Setup");
    println!();
    println!("Welcome to Pugg! Let's make sure everything is configured correctly.\n");

    // Step 1: Check Canvas credentials
    println!("{}", style("Step 1: Checking Canvas configuration").bold().cyan());
    println!();

    if settings.canvas.base_url.is_empty() || settings.canvas.token.is_empty() {
        Output::warning("Canvas base URL and/or access token are not configured.");
        println!();
        println!("  Pugg needs your Canvas instance URL and an API access token.");
        println!(
            "  Generate a token under: {}",
            style("Canvas → Account → Settings → New Access Token").underlined()
        );
        println!();
        println!("  Either export them:");
        println!(
            "  {}",
            style("export CANVAS_BASE_URL='https://school.instructure.com'").green()
        );
        println!("  {}", style("export CANVAS_TOKEN='...'").green());
        println!();
        println!("  Or set canvas.base_url and canvas.token in the config file.");
        println!();

        if !prompt_continue("Continue anyway?")? {
            println!();
            Output::info("Setup cancelled. Configure Canvas access and run 'pugg init' again.");
            return Ok(());
        }
    } else {
        Output::success("Canvas access is configured!");
    }

    println!();

    // Step 2: Check LLM credentials
    println!("{}", style("Step 2: Checking LLM configuration").bold().cyan());
    println!();

    let has_llm_key = settings.llm.api_key.as_ref().is_some_and(|k| !k.is_empty())
        || std::env::var("OPENAI_API_KEY").map(|k| !k.is_empty()).unwrap_or(false);

    if !has_llm_key {
        Output::warning("No LLM API key found.");
        println!();
        println!("  The 'chat' and 'agent' commands need an OpenAI-compatible API key.");
        println!("  {}", style("export OPENAI_API_KEY='sk-...'").green());
        println!();
        println!("  For a local or proxied endpoint, also set LM_BASE_URL and LM_MODEL.");
        println!();

        if !prompt_continue("Continue without an LLM key?")? {
            println!();
            Output::info("Setup cancelled. Set your API key and run 'pugg init' again.");
            return Ok(());
        }
    } else {
        Output::success("LLM API key is configured!");
    }

    println!();

    // Step 3: Create data directory
    println!("{}", style("Step 3: Setting up directories").bold().cyan());
    println!();

    let data_dir = settings.data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        Output::success(&format!("Created data directory: {}", data_dir.display()));
    } else {
        Output::info(&format!("Data directory exists: {}", data_dir.display()));
    }

    println!();

    // Step 4: Create config file
    println!("{}", style("Step 4: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!("  Edit your config with: {}", style("pugg config edit").green());
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check configuration status", style("pugg doctor").cyan());
    println!("  {} See what's due this week", style("pugg upcoming").cyan());
    println!(
        "  {} Plan study time conversationally",
        style("pugg chat").cyan()
    );
    println!();
    println!("For more help: {}", style("pugg --help").cyan());

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}
