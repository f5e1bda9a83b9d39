// External code-similarity tools
// Source-code submissions are compared by a dedicated tool run out of process

pub mod jplag;


use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

pub use jplag::{DockerJplag, JplagConfig};

/// One submission pair as scored by an external tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolComparison {
    pub first: String,
    pub second: String,
    /// Fraction in `[0, 1]`
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReport {
    pub tool: String,
    pub comparisons: Vec<ToolComparison>,
}

impl ToolReport {
    /// Build a report with comparisons ranked like scorer pairs
    #[inline]
    pub fn new(tool: impl Into<String>, mut comparisons: Vec<ToolComparison>) -> Self {
        rank_comparisons(&mut comparisons);
        Self {
            tool: tool.into(),
            comparisons,
        }
    }

    #[inline]
    pub fn above(&self, threshold: f64) -> impl Iterator<Item = &ToolComparison> {
        self.comparisons
            .iter()
            .take_while(move |c| c.similarity >= threshold)
    }
}

/// Similarity descending, then submission names ascending
#[inline]
pub fn rank_comparisons(comparisons: &mut [ToolComparison]) {
    comparisons.sort_by(|left, right| {
        right
            .similarity
            .total_cmp(&left.similarity)
            .then_with(|| left.first.cmp(&right.first))
            .then_with(|| left.second.cmp(&right.second))
    });
}

#[async_trait]
pub trait CodeSimilarityTool: Send + Sync {
    fn name(&self) -> &str;

    /// Compare every submission found under `submissions` against every other
    async fn compare(&self, submissions: &Path) -> Result<ToolReport>;
}
