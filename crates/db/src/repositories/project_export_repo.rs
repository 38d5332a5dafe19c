//! Repository for the `project_exports` table.

use sqlx::PgPool;

use seobuilder_core::types::{DbId, Timestamp};

use crate::models::project_export::{CreateProjectExport, ProjectExport};
use crate::models::status::ExportStatus;

const COLUMNS: &str = "id, project_id, export_type, status_id, file_path, original_filename, \
     file_size, download_count, last_downloaded_at, expires_at, snapshot_sha, \
     export_metadata, error_message, created_at, updated_at";

/// Provides CRUD and lifecycle operations for project exports.
///
/// Status transitions are guarded in SQL: each `mark_*` method matches only
/// rows in the legal source state, so an illegal transition returns `None`
/// instead of silently overwriting a terminal state.
pub struct ProjectExportRepo;

impl ProjectExportRepo {
    /// Insert a new export record in `pending` status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProjectExport,
    ) -> Result<ProjectExport, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_exports
                (project_id, export_type, status_id, snapshot_sha, expires_at, export_metadata)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectExport>(&query)
            .bind(input.project_id)
            .bind(&input.export_type)
            .bind(ExportStatus::Pending.id())
            .bind(&input.snapshot_sha)
            .bind(input.expires_at)
            .bind(&input.export_metadata)
            .fetch_one(pool)
            .await
    }

    /// Find an export by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectExport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_exports WHERE id = $1");
        sqlx::query_as::<_, ProjectExport>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List exports for a project, most recent first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProjectExport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_exports
             WHERE project_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ProjectExport>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Transition `pending → processing`.
    pub async fn mark_processing(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectExport>, sqlx::Error> {
        let query = format!(
            "UPDATE project_exports SET status_id = $2, updated_at = NOW()
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectExport>(&query)
            .bind(id)
            .bind(ExportStatus::Processing.id())
            .bind(ExportStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Transition `processing → ready`, recording the artifact metadata.
    pub async fn mark_ready(
        pool: &PgPool,
        id: DbId,
        file_path: &str,
        original_filename: &str,
        file_size: Option<i64>,
    ) -> Result<Option<ProjectExport>, sqlx::Error> {
        let query = format!(
            "UPDATE project_exports SET
                status_id = $2,
                file_path = $3,
                original_filename = $4,
                file_size = $5,
                updated_at = NOW()
             WHERE id = $1 AND status_id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectExport>(&query)
            .bind(id)
            .bind(ExportStatus::Ready.id())
            .bind(file_path)
            .bind(original_filename)
            .bind(file_size)
            .bind(ExportStatus::Processing.id())
            .fetch_optional(pool)
            .await
    }

    /// Transition `pending | processing → failed`.
    ///
    /// Does not clear any file reference; a failed export never had one.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<ProjectExport>, sqlx::Error> {
        let query = format!(
            "UPDATE project_exports SET
                status_id = $2,
                error_message = $3,
                updated_at = NOW()
             WHERE id = $1 AND status_id IN ($4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectExport>(&query)
            .bind(id)
            .bind(ExportStatus::Failed.id())
            .bind(error_message)
            .bind(ExportStatus::Pending.id())
            .bind(ExportStatus::Processing.id())
            .fetch_optional(pool)
            .await
    }

    /// Atomically bump the download counter and stamp the download time.
    pub async fn record_download(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE project_exports SET
                download_count = download_count + 1,
                last_downloaded_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await
        .map(|_| ())
    }

    /// Delete an export row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_exports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List exports created before `cutoff`, oldest first, in a bounded
    /// batch. Used by the housekeeping sweeps.
    pub async fn list_created_before(
        pool: &PgPool,
        cutoff: Timestamp,
        limit: i64,
    ) -> Result<Vec<ProjectExport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_exports
             WHERE created_at < $1
             ORDER BY created_at
             LIMIT $2"
        );
        sqlx::query_as::<_, ProjectExport>(&query)
            .bind(cutoff)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
