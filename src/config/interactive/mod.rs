
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::path::Path;
use std::process::Command;

use super::Config;
use crate::external::JplagConfig;
use crate::report::ReportConfig;
use crate::similarity::{IdfVariant, ScorerConfig};

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("Plagiarism Check Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir)?;

    eprintln!("{}", style("Scoring").bold().yellow());
    eprintln!("Controls how documents are tokenized and weighted.");
    eprintln!();
    configure_scorer(&mut config.scorer)?;

    eprintln!();
    eprintln!("{}", style("Reports").bold().yellow());
    configure_report(&mut config.report)?;

    eprintln!();
    eprintln!("{}", style("Source code comparison (JPlag)").bold().yellow());
    configure_jplag(&mut config.jplag)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    if docker_available(&config.jplag.docker_binary) {
        eprintln!("{}", style("✓ Docker is available!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not run the Docker binary").yellow()
        );
        eprintln!("Text checks still work; the `code` command needs Docker.");
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Scoring:").bold().yellow());
    eprintln!(
        "  Min token length: {}",
        style(config.scorer.min_token_length).cyan()
    );
    eprintln!("  IDF: {}", style(config.scorer.idf).cyan());
    eprintln!(
        "  Extra stop words: {}",
        style(config.scorer.extra_stop_words.len()).cyan()
    );
    if let Some(min_score) = config.scorer.min_score {
        eprintln!("  Min score: {}", style(min_score).cyan());
    }
    if let Some(max_pairs) = config.scorer.max_pairs {
        eprintln!("  Max pairs: {}", style(max_pairs).cyan());
    }
    eprintln!(
        "  Max documents: {}",
        style(config.scorer.max_documents).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Reports:").bold().yellow());
    eprintln!(
        "  Flag threshold: {}",
        style(config.report.flag_threshold).cyan()
    );
    eprintln!(
        "  Max flagged pairs: {}",
        style(config.report.max_flagged_pairs).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Web:").bold().yellow());
    eprintln!("  User agent: {}", style(&config.web.user_agent).cyan());
    eprintln!("  Timeout: {}s", style(config.web.timeout_seconds).cyan());

    eprintln!();
    eprintln!("{}", style("JPlag:").bold().yellow());
    eprintln!("  Image: {}", style(&config.jplag.image).cyan());
    eprintln!("  Language: {}", style(&config.jplag.language).cyan());

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );
    eprintln!("Database: {}", style(config.database_path().display()).dim());

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Result<Config> {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No usable configuration found. Using defaults.").yellow()
            );
            Ok(Config::with_base_dir(config_dir))
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_scorer(scorer: &mut ScorerConfig) -> Result<()> {
    let min_token_length: usize = Input::new()
        .with_prompt("Minimum token length")
        .default(scorer.min_token_length)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if (1..=64).contains(input) {
                Ok(())
            } else {
                Err("Token length must be between 1 and 64")
            }
        })
        .interact_text()?;

    let variants = [IdfVariant::Smoothed, IdfVariant::Standard];
    let default_index = variants
        .iter()
        .position(|&v| v == scorer.idf)
        .unwrap_or(0);
    let labels: Vec<String> = variants.iter().map(ToString::to_string).collect();

    let idf_index = Select::new()
        .with_prompt("IDF formula")
        .default(default_index)
        .items(&labels)
        .interact()?;

    scorer.min_token_length = min_token_length;
    scorer.idf = variants[idf_index];
    Ok(())
}

fn configure_report(report: &mut ReportConfig) -> Result<()> {
    let flag_threshold: f64 = Input::new()
        .with_prompt("Flag pairs scoring at or above")
        .default(report.flag_threshold)
        .validate_with(|input: &f64| -> Result<(), &str> {
            if (0.0..=1.0).contains(input) {
                Ok(())
            } else {
                Err("Threshold must be between 0.0 and 1.0")
            }
        })
        .interact_text()?;

    let max_flagged_pairs: usize = Input::new()
        .with_prompt("Maximum flagged pairs per report")
        .default(report.max_flagged_pairs)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if (1..=10_000).contains(input) {
                Ok(())
            } else {
                Err("Must be between 1 and 10000")
            }
        })
        .interact_text()?;

    report.flag_threshold = flag_threshold;
    report.max_flagged_pairs = max_flagged_pairs;
    Ok(())
}

fn configure_jplag(jplag: &mut JplagConfig) -> Result<()> {
    let language: String = Input::new()
        .with_prompt("JPlag language module")
        .default(jplag.language.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Language cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    jplag.language = language.trim().to_string();
    Ok(())
}

fn docker_available(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}
