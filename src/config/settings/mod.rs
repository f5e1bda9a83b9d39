
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::database::DATABASE_FILE;
use crate::external::JplagConfig;
use crate::extract::WebConfig;
use crate::report::ReportConfig;
use crate::similarity::ScorerConfig;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub jplag: JplagConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid scorer settings: {0}")]
    InvalidScorer(String),
    #[error("Invalid flag threshold: {0} (must be between 0.0 and 1.0)")]
    InvalidThreshold(f64),
    #[error("Invalid max flagged pairs: {0} (must be between 1 and 10000)")]
    InvalidMaxFlaggedPairs(usize),
    #[error("Invalid evidence limit: {0} (must be between 0 and 100)")]
    InvalidEvidenceLimit(usize),
    #[error("Invalid user agent (cannot be empty)")]
    InvalidUserAgent,
    #[error("Invalid request timeout: {0} (must be between 1 and 300 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid max retries: {0} (must be between 0 and 10)")]
    InvalidMaxRetries(u32),
    #[error("Invalid retry delay: {0} (must be between 0 and 60 seconds)")]
    InvalidRetryDelay(u64),
    #[error("Invalid JPlag setting '{0}' (cannot be empty)")]
    EmptyJplagSetting(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Default settings rooted at `base_dir`
    #[inline]
    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::with_base_dir(config_dir));
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Default base directory, `~/.plagiarism-check`
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".plagiarism-check"))
            .or_else(|| dirs::data_dir().map(|data| data.join("plagiarism-check")))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scorer
            .validate()
            .map_err(|e| ConfigError::InvalidScorer(e.to_string()))?;
        self.validate_report_config()?;
        self.validate_web_config()?;
        self.validate_jplag_config()?;
        Ok(())
    }

    fn validate_report_config(&self) -> Result<(), ConfigError> {
        let config = &self.report;

        if !(0.0..=1.0).contains(&config.flag_threshold) {
            return Err(ConfigError::InvalidThreshold(config.flag_threshold));
        }

        if !(1..=10_000).contains(&config.max_flagged_pairs) {
            return Err(ConfigError::InvalidMaxFlaggedPairs(
                config.max_flagged_pairs,
            ));
        }

        for limit in [config.shared_terms_per_pair, config.passages_per_pair] {
            if limit > 100 {
                return Err(ConfigError::InvalidEvidenceLimit(limit));
            }
        }

        Ok(())
    }

    fn validate_web_config(&self) -> Result<(), ConfigError> {
        let config = &self.web;

        if config.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidUserAgent);
        }

        if !(1..=300).contains(&config.timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(config.timeout_seconds));
        }

        if config.max_retries > 10 {
            return Err(ConfigError::InvalidMaxRetries(config.max_retries));
        }

        if config.retry_delay_seconds > 60 {
            return Err(ConfigError::InvalidRetryDelay(config.retry_delay_seconds));
        }

        Ok(())
    }

    fn validate_jplag_config(&self) -> Result<(), ConfigError> {
        let config = &self.jplag;

        for (name, value) in [
            ("docker_binary", &config.docker_binary),
            ("image", &config.image),
            ("language", &config.language),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyJplagSetting(name));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join(CONFIG_FILE)
    }

    /// Get the path for the SQLite report database
    #[inline]
    pub fn database_path(&self) -> PathBuf {
        self.get_base_dir().join(DATABASE_FILE)
    }

    /// Where external tool runs leave their output
    #[inline]
    pub fn tool_output_dir(&self) -> PathBuf {
        self.get_base_dir().join("tool-runs")
    }
}
