use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{debug, info};

use crate::database::sqlite::models::ReportRecord;
use crate::database::sqlite::queries::ReportQueries;
use crate::report::PlagiarismReport;


pub mod models;
pub mod queries;

pub type DbPool = Pool<Sqlite>;

/// File name of the report database inside the config directory
pub const DATABASE_FILE: &str = "reports.db";

#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    #[inline]
    pub async fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        let database = Self { pool };
        database.run_migrations().await?;

        Ok(database)
    }

    #[inline]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    #[inline]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::migrate!("src/database/sqlite/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run schema migration")?;

        debug!("Database migrations completed successfully");
        Ok(())
    }

    #[inline]
    pub async fn initialize_from_config_dir(config_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        Self::new(config_dir.join(DATABASE_FILE)).await
    }

    #[inline]
    pub async fn save_report(&self, report: &PlagiarismReport) -> Result<ReportRecord> {
        ReportQueries::create(&self.pool, report).await
    }

    #[inline]
    pub async fn get_report(&self, id: &str) -> Result<Option<PlagiarismReport>> {
        queries::load_report(&self.pool, id).await
    }

    #[inline]
    pub async fn list_reports(&self) -> Result<Vec<ReportRecord>> {
        ReportQueries::list_all(&self.pool).await
    }

    #[inline]
    pub async fn list_reports_for_article(&self, article_id: &str) -> Result<Vec<ReportRecord>> {
        ReportQueries::list_by_article(&self.pool, article_id).await
    }

    #[inline]
    pub async fn delete_report(&self, id: &str) -> Result<bool> {
        ReportQueries::delete(&self.pool, id).await
    }
}
