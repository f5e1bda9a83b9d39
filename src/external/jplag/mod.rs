#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{CodeSimilarityTool, ToolComparison, ToolReport};
use crate::{PlagiarismError, Result};

const RESULTS_FILE: &str = "results.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JplagConfig {
    pub docker_binary: String,
    pub image: String,
    /// JPlag language module, e.g. `java`, `python3`, `cpp`
    pub language: String,
}

impl Default for JplagConfig {
    #[inline]
    fn default() -> Self {
        Self {
            docker_binary: "docker".to_string(),
            image: "ghcr.io/jplag/jplag:latest".to_string(),
            language: "java".to_string(),
        }
    }
}

/// JPlag run inside a Docker container
#[derive(Debug, Clone)]
pub struct DockerJplag {
    config: JplagConfig,
    output_root: PathBuf,
}

impl DockerJplag {
    /// Each run writes its results to a fresh directory under `output_root`
    #[inline]
    pub fn new(config: JplagConfig, output_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_root: output_root.into(),
        }
    }

    #[inline]
    pub fn config(&self) -> &JplagConfig {
        &self.config
    }

    /// Arguments passed to the docker binary
    #[inline]
    pub fn build_args(&self, submissions: &Path, output: &Path) -> Vec<String> {
        vec![
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{}:/submissions:ro", submissions.display()),
            "-v".to_string(),
            format!("{}:/results", output.display()),
            self.config.image.clone(),
            "-l".to_string(),
            self.config.language.clone(),
            "-r".to_string(),
            "/results/report".to_string(),
            "--mode".to_string(),
            "run".to_string(),
            "--csv-export".to_string(),
            "/submissions".to_string(),
        ]
    }
}

#[async_trait]
impl CodeSimilarityTool for DockerJplag {
    #[inline]
    fn name(&self) -> &str {
        "jplag"
    }

    #[inline]
    async fn compare(&self, submissions: &Path) -> Result<ToolReport> {
        if !submissions.is_dir() {
            return Err(PlagiarismError::InvalidInput(format!(
                "Submissions directory not found: {}",
                submissions.display()
            )));
        }
        let submissions = fs::canonicalize(submissions)?;

        let output = self.output_root.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&output)?;

        let result = match fs::canonicalize(&output) {
            Ok(run_dir) => self.run(&submissions, &run_dir).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = fs::remove_dir_all(&output) {
            warn!("Failed to remove JPlag run directory {}: {}", output.display(), e);
        }

        let comparisons = result?;
        info!("JPlag reported {} comparisons", comparisons.len());
        Ok(ToolReport::new(self.name(), comparisons))
    }
}

impl DockerJplag {
    /// Run the container and read its results; the caller owns `output`
    async fn run(&self, submissions: &Path, output: &Path) -> Result<Vec<ToolComparison>> {
        info!(
            "Running JPlag ({}) on {}",
            self.config.language,
            submissions.display()
        );
        let args = self.build_args(submissions, output);
        debug!("{} {}", self.config.docker_binary, args.join(" "));

        let result = Command::new(&self.config.docker_binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                PlagiarismError::ExternalTool(format!(
                    "Failed to start {}: {}",
                    self.config.docker_binary, e
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!("JPlag exited with {}", result.status);
            return Err(PlagiarismError::ExternalTool(format!(
                "JPlag exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        let csv_path = find_results_file(output)?.ok_or_else(|| {
            PlagiarismError::ExternalTool(format!(
                "JPlag produced no {} in {}",
                RESULTS_FILE,
                output.display()
            ))
        })?;
        parse_results_csv(&fs::read_to_string(&csv_path)?)
    }
}

/// Locate `results.csv` anywhere below the output directory
#[inline]
pub fn find_results_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.file_name().is_some_and(|name| name == RESULTS_FILE) {
                return Ok(Some(path));
            }
        }
    }

    Ok(None)
}

/// Parse JPlag's CSV export: a header row, then `first,second,similarity[,...]`.
///
/// Similarity may be a fraction or a percentage; values above 1 are scaled down.
#[inline]
pub fn parse_results_csv(contents: &str) -> Result<Vec<ToolComparison>> {
    let mut comparisons = Vec::new();

    for (line_number, line) in contents.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [first, second, similarity, ..] = fields.as_slice() else {
            return Err(PlagiarismError::ExternalTool(format!(
                "Malformed JPlag result on line {}: {}",
                line_number + 1,
                line
            )));
        };

        let value: f64 = similarity.parse().map_err(|_| {
            PlagiarismError::ExternalTool(format!(
                "Invalid similarity '{}' on line {}",
                similarity,
                line_number + 1
            ))
        })?;
        if !value.is_finite() {
            return Err(PlagiarismError::ExternalTool(format!(
                "Non-finite similarity '{}' on line {}",
                similarity,
                line_number + 1
            )));
        }
        let value = if value > 1.0 { value / 100.0 } else { value };

        comparisons.push(ToolComparison {
            first: unquote(first),
            second: unquote(second),
            similarity: value.clamp(0.0, 1.0),
        });
    }

    Ok(comparisons)
}

fn unquote(field: &str) -> String {
    field.trim_matches('"').to_string()
}
