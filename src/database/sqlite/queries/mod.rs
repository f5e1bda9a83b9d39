
use super::models::*;
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

use crate::report::PlagiarismReport;

const REPORT_COLUMNS: &str =
    "id, article_id, threshold, status, max_score, pair_count, created_date";

pub struct ReportQueries;

impl ReportQueries {
    /// Store a report with its documents and flagged pairs in one transaction
    #[inline]
    pub async fn create(pool: &SqlitePool, report: &PlagiarismReport) -> Result<ReportRecord> {
        let mut tx = pool
            .begin()
            .await
            .context("Failed to begin report transaction")?;

        sqlx::query(
            "INSERT INTO plagiarism_reports (id, article_id, threshold, status, max_score, pair_count, created_date) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&report.id)
        .bind(&report.article_id)
        .bind(report.threshold)
        .bind(report.status)
        .bind(report.max_score)
        .bind(report.pair_count as i64)
        .bind(report.created_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert report")?;

        for (position, document) in report.documents.iter().enumerate() {
            sqlx::query(
                "INSERT INTO report_documents (report_id, position, document_id, filename, term_count) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&report.id)
            .bind(position as i64)
            .bind(&document.id)
            .bind(&document.filename)
            .bind(document.term_count as i64)
            .execute(&mut *tx)
            .await
            .context("Failed to insert report document")?;
        }

        for (position, pair) in report.flagged.iter().enumerate() {
            let shared_terms = serde_json::to_string(&pair.shared_terms)
                .context("Failed to encode shared terms")?;
            let passages =
                serde_json::to_string(&pair.passages).context("Failed to encode passages")?;

            sqlx::query(
                "INSERT INTO flagged_pairs (report_id, position, a_id, a_filename, b_id, b_filename, score, shared_terms, passages) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&report.id)
            .bind(position as i64)
            .bind(&pair.a_id)
            .bind(&pair.a_filename)
            .bind(&pair.b_id)
            .bind(&pair.b_filename)
            .bind(pair.score)
            .bind(shared_terms)
            .bind(passages)
            .execute(&mut *tx)
            .await
            .context("Failed to insert flagged pair")?;
        }

        tx.commit()
            .await
            .context("Failed to commit report transaction")?;

        debug!(
            "Stored report {} with {} flagged pairs",
            report.id,
            report.flagged.len()
        );

        Self::get_by_id(pool, &report.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created report"))
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> Result<Option<ReportRecord>> {
        let result = sqlx::query_as::<_, ReportRecord>(&format!(
            "SELECT {} FROM plagiarism_reports WHERE id = ?",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get report by id")?;

        Ok(result)
    }

    /// All reports, newest first
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ReportRecord>> {
        let results = sqlx::query_as::<_, ReportRecord>(&format!(
            "SELECT {} FROM plagiarism_reports ORDER BY created_date DESC, id",
            REPORT_COLUMNS
        ))
        .fetch_all(pool)
        .await
        .context("Failed to list reports")?;

        Ok(results)
    }

    #[inline]
    pub async fn list_by_article(
        pool: &SqlitePool,
        article_id: &str,
    ) -> Result<Vec<ReportRecord>> {
        let results = sqlx::query_as::<_, ReportRecord>(&format!(
            "SELECT {} FROM plagiarism_reports WHERE article_id = ? ORDER BY created_date DESC, id",
            REPORT_COLUMNS
        ))
        .bind(article_id)
        .fetch_all(pool)
        .await
        .context("Failed to list reports for article")?;

        Ok(results)
    }

    /// Returns false when no report had the id. Documents and pairs cascade.
    #[inline]
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM plagiarism_reports WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete report")?
            .rows_affected();

        Ok(affected > 0)
    }
}

pub struct ReportDocumentQueries;

impl ReportDocumentQueries {
    #[inline]
    pub async fn list_for_report(
        pool: &SqlitePool,
        report_id: &str,
    ) -> Result<Vec<ReportDocumentRecord>> {
        let results = sqlx::query_as::<_, ReportDocumentRecord>(
            "SELECT id, report_id, position, document_id, filename, term_count FROM report_documents WHERE report_id = ? ORDER BY position",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
        .context("Failed to list report documents")?;

        Ok(results)
    }
}

pub struct FlaggedPairQueries;

impl FlaggedPairQueries {
    #[inline]
    pub async fn list_for_report(
        pool: &SqlitePool,
        report_id: &str,
    ) -> Result<Vec<FlaggedPairRecord>> {
        let results = sqlx::query_as::<_, FlaggedPairRecord>(
            "SELECT id, report_id, position, a_id, a_filename, b_id, b_filename, score, shared_terms, passages FROM flagged_pairs WHERE report_id = ? ORDER BY position",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
        .context("Failed to list flagged pairs")?;

        Ok(results)
    }
}

/// Load a complete report with its documents and flagged pairs
#[inline]
pub async fn load_report(pool: &SqlitePool, id: &str) -> Result<Option<PlagiarismReport>> {
    let Some(record) = ReportQueries::get_by_id(pool, id).await? else {
        return Ok(None);
    };

    let documents = ReportDocumentQueries::list_for_report(pool, id).await?;
    let pairs = FlaggedPairQueries::list_for_report(pool, id).await?;

    assemble_report(record, documents, pairs).map(Some)
}
