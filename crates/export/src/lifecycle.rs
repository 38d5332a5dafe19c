//! Export record lifecycle: creation, staleness detection, deletion, and
//! housekeeping sweeps.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use seobuilder_core::error::CoreError;
use seobuilder_core::snapshot::snapshot_sha;
use seobuilder_core::types::DbId;
use seobuilder_db::models::project_export::{CreateProjectExport, ProjectExport};
use seobuilder_db::repositories::{PageRepo, ProjectExportRepo};
use seobuilder_storage::StorageBackend;

/// Export records older than this are swept on every new export creation.
pub const EXPORT_RETENTION_HOURS: i64 = 24;

/// Maximum records removed per housekeeping sweep.
pub const SWEEP_BATCH_SIZE: i64 = 100;

/// Create a `pending` export record for a project.
///
/// Computes the content fingerprint over the project's current pages, then
/// opportunistically sweeps exports older than the retention window. The
/// sweep is best-effort: its failure never fails the creation.
pub async fn create_export(
    pool: &PgPool,
    storage: &dyn StorageBackend,
    project_id: DbId,
    export_type: &str,
) -> Result<ProjectExport, CoreError> {
    let fingerprints = PageRepo::fingerprints(pool, project_id)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;
    let sha = snapshot_sha(&fingerprints);

    let export = ProjectExportRepo::create(
        pool,
        &CreateProjectExport {
            project_id,
            export_type: export_type.to_string(),
            snapshot_sha: sha,
            expires_at: None,
            export_metadata: None,
        },
    )
    .await
    .map_err(|e| CoreError::Internal(e.to_string()))?;

    let cutoff = Utc::now() - Duration::hours(EXPORT_RETENTION_HOURS);
    match sweep_exports_before(pool, storage, cutoff, SWEEP_BATCH_SIZE).await {
        Ok(swept) if swept > 0 => {
            tracing::info!(swept, "Housekeeping removed old exports");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Housekeeping sweep failed");
        }
    }

    Ok(export)
}

/// Whether the project's pages changed since the export's snapshot.
///
/// Returns `true` when no snapshot was ever stored.
pub async fn has_project_changed(
    pool: &PgPool,
    export: &ProjectExport,
) -> Result<bool, CoreError> {
    let Some(stored) = &export.snapshot_sha else {
        return Ok(true);
    };

    let fingerprints = PageRepo::fingerprints(pool, export.project_id)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;
    Ok(snapshot_sha(&fingerprints) != *stored)
}

/// Delete an export record and its backing artifact.
///
/// The artifact is removed first so a failure cannot orphan a file behind
/// a deleted row; a missing artifact is not an error.
pub async fn delete_export(
    pool: &PgPool,
    storage: &dyn StorageBackend,
    export: &ProjectExport,
) -> Result<(), CoreError> {
    if let Some(path) = &export.file_path {
        storage
            .delete(path)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))?;
    }

    ProjectExportRepo::delete(pool, export.id)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;
    Ok(())
}

/// Remove export records created before `cutoff` (and their artifacts) in
/// one bounded batch. Returns the number of rows removed.
pub async fn sweep_exports_before(
    pool: &PgPool,
    storage: &dyn StorageBackend,
    cutoff: seobuilder_core::types::Timestamp,
    limit: i64,
) -> Result<usize, CoreError> {
    let stale = ProjectExportRepo::list_created_before(pool, cutoff, limit)
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;

    let mut removed = 0;
    for export in &stale {
        match delete_export(pool, storage, export).await {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::warn!(export_id = export.id, error = %e, "Could not sweep export");
            }
        }
    }

    Ok(removed)
}
