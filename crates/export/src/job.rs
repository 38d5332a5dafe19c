//! Asynchronous export packaging job.
//!
//! One invocation drives a single export record through
//! `pending → processing → ready | failed`. Errors are re-raised after the
//! record is marked failed so a surrounding job runner's retry policy, if
//! any, still applies.

use sqlx::PgPool;

use seobuilder_core::error::CoreError;
use seobuilder_db::repositories::{PageRepo, ProjectExportRepo, ProjectRepo};
use seobuilder_storage::StorageBackend;

use crate::packager::generate_theme;

/// Run the packaging job for `export_id`.
pub async fn run_export_job(
    pool: &PgPool,
    storage: &dyn StorageBackend,
    export_id: i64,
) -> Result<(), CoreError> {
    tracing::info!(export_id, "Starting export generation");

    let claimed = ProjectExportRepo::mark_processing(pool, export_id)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;

    let Some(export) = claimed else {
        // Row missing or no longer pending: nothing to do here.
        tracing::warn!(export_id, "Export not claimable; skipping");
        return Ok(());
    };

    match package(pool, storage, &export).await {
        Ok(()) => {
            tracing::info!(export_id, project_id = export.project_id, "Export completed");
            Ok(())
        }
        Err(e) => {
            tracing::error!(export_id, project_id = export.project_id, error = %e, "Export failed");
            if let Err(mark_err) =
                ProjectExportRepo::mark_failed(pool, export_id, &e.to_string()).await
            {
                tracing::error!(export_id, error = %mark_err, "Failed to mark export as failed");
            }
            Err(e)
        }
    }
}

async fn package(
    pool: &PgPool,
    storage: &dyn StorageBackend,
    export: &seobuilder_db::models::project_export::ProjectExport,
) -> Result<(), CoreError> {
    let project = ProjectRepo::find_by_id(pool, export.project_id)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: export.project_id,
        })?;

    let pages = PageRepo::list_by_project(pool, project.id)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;

    let generated = generate_theme(storage, &project, &pages).await?;

    // Probe the artifact size; a probe failure leaves the size null rather
    // than failing the export.
    let file_size = match storage.size(&generated.archive_path).await {
        Ok(size) => Some(size as i64),
        Err(e) => {
            tracing::warn!(path = %generated.archive_path, error = %e, "Could not probe archive size");
            None
        }
    };

    let download_name = format!("project-{}-theme.zip", project.name);

    ProjectExportRepo::mark_ready(
        pool,
        export.id,
        &generated.archive_path,
        &download_name,
        file_size,
    )
    .await
    .map_err(|e| CoreError::Internal(e.to_string()))?
    .ok_or_else(|| {
        CoreError::Conflict(format!(
            "Export {} left the processing state during packaging",
            export.id
        ))
    })?;

    Ok(())
}
