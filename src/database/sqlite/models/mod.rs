
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::report::{DocumentSummary, FlaggedPair, PlagiarismReport, ReportStatus};

/// Report header row as stored in `plagiarism_reports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReportRecord {
    pub id: String,
    pub article_id: String,
    pub threshold: f64,
    pub status: ReportStatus,
    pub max_score: f64,
    pub pair_count: i64,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReportDocumentRecord {
    pub id: i64,
    pub report_id: String,
    pub position: i64,
    pub document_id: String,
    pub filename: String,
    pub term_count: i64,
}

impl ReportDocumentRecord {
    #[inline]
    pub fn into_summary(self) -> DocumentSummary {
        DocumentSummary {
            id: self.document_id,
            filename: self.filename,
            term_count: usize::try_from(self.term_count).unwrap_or_default(),
        }
    }
}

/// Flagged pair row; terms and passages are stored as JSON arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FlaggedPairRecord {
    pub id: i64,
    pub report_id: String,
    pub position: i64,
    pub a_id: String,
    pub a_filename: String,
    pub b_id: String,
    pub b_filename: String,
    pub score: f64,
    pub shared_terms: String,
    pub passages: String,
}

impl FlaggedPairRecord {
    #[inline]
    pub fn into_flagged_pair(self) -> Result<FlaggedPair> {
        let shared_terms: Vec<String> = serde_json::from_str(&self.shared_terms)
            .with_context(|| format!("Corrupt shared terms for pair {}", self.id))?;
        let passages: Vec<String> = serde_json::from_str(&self.passages)
            .with_context(|| format!("Corrupt passages for pair {}", self.id))?;

        Ok(FlaggedPair {
            a_id: self.a_id,
            a_filename: self.a_filename,
            b_id: self.b_id,
            b_filename: self.b_filename,
            score: self.score,
            shared_terms,
            passages,
        })
    }
}

/// Reassemble a full report from its stored rows
#[inline]
pub fn assemble_report(
    record: ReportRecord,
    documents: Vec<ReportDocumentRecord>,
    pairs: Vec<FlaggedPairRecord>,
) -> Result<PlagiarismReport> {
    let flagged = pairs
        .into_iter()
        .map(FlaggedPairRecord::into_flagged_pair)
        .collect::<Result<Vec<_>>>()?;

    Ok(PlagiarismReport {
        id: record.id,
        article_id: record.article_id,
        created_at: record.created_date,
        threshold: record.threshold,
        status: record.status,
        max_score: record.max_score,
        pair_count: usize::try_from(record.pair_count).unwrap_or_default(),
        documents: documents
            .into_iter()
            .map(ReportDocumentRecord::into_summary)
            .collect(),
        flagged,
    })
}
