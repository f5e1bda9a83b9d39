use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::PlagiarismError;
use crate::config::Config;
use crate::database::Database;
use crate::external::{CodeSimilarityTool, DockerJplag, ToolReport};
use crate::extract::{HttpClient, fetch_document, load_documents};
use crate::report::{PlagiarismReport, ReportStatus, build_report};
use crate::similarity::{Document, SimilarityResult, compute_similarities, documents_from_json};

/// Article id used when a check is not tied to a specific article
pub const DEFAULT_ARTICLE_ID: &str = "unassigned";

/// Inputs for one plagiarism check
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    pub files: Vec<PathBuf>,
    pub urls: Vec<String>,
    pub article_id: Option<String>,
    /// Overrides the configured flag threshold
    pub threshold: Option<f64>,
    pub json: bool,
    pub save: bool,
}

/// Score a set of files and pages against each other and print the report
#[inline]
pub async fn check(config: &Config, request: &CheckRequest) -> Result<PlagiarismReport> {
    let report = run_check(config, request).await?;

    if request.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.render());
    }

    if request.save {
        let database = open_database(config).await?;
        database
            .save_report(&report)
            .await
            .context("Failed to save report")?;
        if !request.json {
            println!("\n✓ Report saved (ID: {})", report.id);
        }
    }

    Ok(report)
}

/// Load, score and report without printing anything
#[inline]
pub async fn run_check(config: &Config, request: &CheckRequest) -> Result<PlagiarismReport> {
    let mut report_config = config.report.clone();
    if let Some(threshold) = request.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PlagiarismError::InvalidInput(format!(
                "Threshold must be between 0.0 and 1.0, got {}",
                threshold
            ))
            .into());
        }
        report_config.flag_threshold = threshold;
    }

    let mut documents = load_files(&request.files);
    documents.extend(fetch_pages(config, &request.urls).await);

    if documents.len() < 2 {
        warn!(
            "Only {} document(s) available, nothing to compare",
            documents.len()
        );
    }

    let result = score(config, documents).await?;
    let article_id = request.article_id.as_deref().unwrap_or(DEFAULT_ARTICLE_ID);
    let report = build_report(
        article_id,
        &result,
        &report_config,
        &config.scorer.tokenizer(),
    );

    Ok(report)
}

/// Score a JSON array of `{id, filename, text}` documents and print the ranked pairs as JSON
#[inline]
pub async fn compare_json(
    config: &Config,
    input: &Path,
    top: Option<usize>,
) -> Result<SimilarityResult> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {}", input.display()))?;
    let documents = documents_from_json(&value)?;

    let mut result = score(config, documents).await?;
    if let Some(top) = top {
        result.pairs.truncate(top);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to serialize result")?
    );

    Ok(result)
}

/// List stored reports, optionally for one article
#[inline]
pub async fn list_reports(config: &Config, article_id: Option<&str>) -> Result<()> {
    let database = open_database(config).await?;

    let reports = match article_id {
        Some(article_id) => database.list_reports_for_article(article_id).await?,
        None => database.list_reports().await?,
    };

    if reports.is_empty() {
        println!("No plagiarism reports have been saved yet.");
        println!("Use 'plagiarism-check check --save <FILES>...' to store one.");
        return Ok(());
    }

    println!("Plagiarism Reports ({} total):", reports.len());
    println!();

    for report in &reports {
        println!("📄 {} (article: {})", report.id, report.article_id);
        println!("   Status: {}", report.status);
        println!(
            "   Highest score: {:.3} (threshold {:.2}, {} pairs)",
            report.max_score, report.threshold, report.pair_count
        );
        println!(
            "   Created: {}",
            report.created_date.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
    }

    let flagged = reports
        .iter()
        .filter(|r| r.status == ReportStatus::Flagged)
        .count();
    println!("Summary:");
    println!("  Total Reports: {}", reports.len());
    println!("  Flagged: {}", flagged);
    println!("  Clean: {}", reports.len() - flagged);

    Ok(())
}

/// Print one stored report
#[inline]
pub async fn show_report(config: &Config, id: &str, json: bool) -> Result<PlagiarismReport> {
    let database = open_database(config).await?;
    let report = database
        .get_report(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Report not found: {}", id))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.render());
    }

    Ok(report)
}

/// Delete one stored report with its flagged pairs
#[inline]
pub async fn delete_report(config: &Config, id: &str) -> Result<()> {
    let database = open_database(config).await?;

    if !database.delete_report(id).await? {
        return Err(anyhow::anyhow!("Report not found: {}", id));
    }

    info!("Deleted report {}", id);
    println!("✓ Report deleted: {}", id);
    Ok(())
}

/// Run the external code-similarity tool over a directory of submissions
#[inline]
pub async fn compare_code(config: &Config, submissions: &Path) -> Result<ToolReport> {
    let tool = DockerJplag::new(config.jplag.clone(), config.tool_output_dir());
    let report = tool.compare(submissions).await.inspect_err(|e| {
        error!("{} failed on {}: {}", tool.name(), submissions.display(), e);
    })?;

    if report.comparisons.is_empty() {
        println!("{} found no submission pairs to compare.", report.tool);
        return Ok(report);
    }

    println!(
        "{} comparisons ({} total):",
        report.tool,
        report.comparisons.len()
    );
    for comparison in &report.comparisons {
        let marker = if comparison.similarity >= config.report.flag_threshold {
            "⚠️ "
        } else {
            "  "
        };
        println!(
            "{} {:.3} {} <-> {}",
            marker, comparison.similarity, comparison.first, comparison.second
        );
    }

    Ok(report)
}

async fn open_database(config: &Config) -> Result<Database> {
    let database = Database::initialize_from_config_dir(config.get_base_dir())
        .await
        .map_err(|e| PlagiarismError::Database(format!("{:#}", e)))?;
    Ok(database)
}

/// Scoring is CPU-bound, so it runs off the async workers
async fn score(config: &Config, documents: Vec<Document>) -> Result<SimilarityResult> {
    let scorer = config.scorer.clone();
    let result = tokio::task::spawn_blocking(move || compute_similarities(&documents, &scorer))
        .await
        .context("Scoring task failed")??;

    info!(
        "Scored {} documents into {} pairs",
        result.docs.len(),
        result.pairs.len()
    );
    Ok(result)
}

fn load_files(files: &[PathBuf]) -> Vec<Document> {
    let bar = progress_bar(files.len(), "{spinner} [{pos}/{len}] Extracting {msg}");
    let mut documents = Vec::with_capacity(files.len());

    for path in files {
        bar.set_message(path.display().to_string());
        documents.extend(load_documents(&[path]));
        bar.inc(1);
    }

    bar.finish_and_clear();
    documents
}

async fn fetch_pages(config: &Config, urls: &[String]) -> Vec<Document> {
    if urls.is_empty() {
        return Vec::new();
    }

    let mut client = HttpClient::new(config.web.clone());
    let bar = progress_bar(urls.len(), "{spinner} [{pos}/{len}] Fetching {msg}");
    let mut documents = Vec::with_capacity(urls.len());

    for url in urls {
        bar.set_message(url.clone());
        match fetch_document(&mut client, url).await {
            Ok(document) => documents.push(document),
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                documents.push(Document::new(url.as_str(), url.as_str(), String::new()));
            }
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    documents
}

fn progress_bar(len: usize, template: &str) -> ProgressBar {
    if !console::user_attended_stderr() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style);
    }
    bar
}
