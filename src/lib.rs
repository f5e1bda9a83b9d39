use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlagiarismError>;

#[derive(Error, Debug)]
pub enum PlagiarismError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod database;
pub mod external;
pub mod extract;
pub mod report;
pub mod similarity;

pub use similarity::{Document, ScorerConfig, SimilarityPair, SimilarityResult, compute_similarities};
