use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plagiarism_check::commands::{
    CheckRequest, check, compare_code, compare_json, delete_report, list_reports, show_report,
};
use plagiarism_check::config::{Config, get_config_dir, run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plagiarism-check")]
#[command(about = "Pairwise TF-IDF similarity scoring and plagiarism reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare files and web pages against each other and report suspicious pairs
    Check {
        /// Files to compare (txt, md, html, pdf, docx)
        files: Vec<PathBuf>,
        /// Web page to include in the comparison (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,
        /// Article the check belongs to
        #[arg(long)]
        article: Option<String>,
        /// Flag pairs scoring at or above this value
        #[arg(long)]
        threshold: Option<f64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Store the report in the local database
        #[arg(long)]
        save: bool,
    },
    /// Score a JSON array of {id, filename, text} documents
    Compare {
        /// Path to the JSON input
        input: PathBuf,
        /// Only print the highest scoring N pairs
        #[arg(long)]
        top: Option<usize>,
    },
    /// Manage saved reports
    Reports {
        #[command(subcommand)]
        action: ReportAction,
    },
    /// Compare source code submissions with JPlag (requires Docker)
    Code {
        /// Directory with one subdirectory or file per submission
        dir: PathBuf,
    },
    /// Configure scoring and report settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
enum ReportAction {
    /// List saved reports
    List {
        /// Only reports for this article
        #[arg(long)]
        article: Option<String>,
    },
    /// Show one report
    Show {
        id: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one report
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_dir = get_config_dir().context("Failed to locate config directory")?;

    if let Commands::Config { show } = cli.command {
        if show {
            show_config(&config_dir)?;
        } else {
            run_interactive_config(&config_dir)?;
        }
        return Ok(());
    }

    let config = Config::load(&config_dir)?;

    match cli.command {
        Commands::Check {
            files,
            urls,
            article,
            threshold,
            json,
            save,
        } => {
            if files.is_empty() && urls.is_empty() {
                anyhow::bail!("Nothing to check: pass at least two files or --url pages");
            }
            let request = CheckRequest {
                files,
                urls,
                article_id: article,
                threshold,
                json,
                save,
            };
            check(&config, &request).await?;
        }
        Commands::Compare { input, top } => {
            compare_json(&config, &input, top).await?;
        }
        Commands::Reports { action } => match action {
            ReportAction::List { article } => {
                list_reports(&config, article.as_deref()).await?;
            }
            ReportAction::Show { id, json } => {
                show_report(&config, &id, json).await?;
            }
            ReportAction::Delete { id } => {
                delete_report(&config, &id).await?;
            }
        },
        Commands::Code { dir } => {
            compare_code(&config, &dir).await?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}
