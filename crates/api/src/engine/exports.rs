//! Export creation, download, and deletion.

use std::sync::Arc;

use chrono::Utc;

use seobuilder_core::error::CoreError;
use seobuilder_db::models::project::Project;
use seobuilder_db::models::project_export::{ProjectExport, EXPORT_TYPE_WORDPRESS_THEME};
use seobuilder_db::repositories::ProjectExportRepo;
use seobuilder_export::job::run_export_job;
use seobuilder_export::lifecycle;

use crate::state::AppState;

/// Create a `pending` export for a project and dispatch the packaging job.
///
/// The record insert and snapshot computation are synchronous; rendering
/// and archiving run in a detached task that drives the record to `ready`
/// or `failed`.
pub async fn create_export(
    state: &AppState,
    project: &Project,
) -> Result<ProjectExport, CoreError> {
    let export = lifecycle::create_export(
        &state.pool,
        state.storage.as_ref(),
        project.id,
        EXPORT_TYPE_WORDPRESS_THEME,
    )
    .await?;

    let pool = state.pool.clone();
    let storage = Arc::clone(&state.storage);
    let export_id = export.id;
    tokio::spawn(async move {
        // run_export_job marks the record failed on error; nothing further
        // to do here beyond letting the error drop.
        let _ = run_export_job(&pool, storage.as_ref(), export_id).await;
    });

    Ok(export)
}

/// Fetch a ready export's archive bytes and download filename.
///
/// Not-ready exports are a conflict (retry later); a ready record whose
/// artifact vanished is not-found. Download bookkeeping is best-effort and
/// never blocks the response.
pub async fn download_export(
    state: &AppState,
    export: &ProjectExport,
) -> Result<(Vec<u8>, String), CoreError> {
    if !export.is_ready(Utc::now()) {
        return Err(CoreError::Conflict("Export is not ready".into()));
    }

    let path = export.file_path.as_deref().ok_or_else(|| {
        CoreError::Internal(format!("Ready export {} has no file path", export.id))
    })?;

    let bytes = state.storage.get(path).await.map_err(|e| match e {
        seobuilder_storage::StorageError::NotFound(_) => CoreError::NotFound {
            entity: "ExportArtifact",
            id: export.id,
        },
        other => CoreError::Storage(other.to_string()),
    })?;

    if let Err(e) = ProjectExportRepo::record_download(&state.pool, export.id).await {
        tracing::warn!(export_id = export.id, error = %e, "Could not record download");
    }

    Ok((bytes, export.download_filename()))
}

/// Delete an export record and its artifact.
pub async fn delete_export(state: &AppState, export: &ProjectExport) -> Result<(), CoreError> {
    lifecycle::delete_export(&state.pool, state.storage.as_ref(), export).await
}

/// Whether the project's pages changed since this export was created.
pub async fn has_project_changed(
    state: &AppState,
    export: &ProjectExport,
) -> Result<bool, CoreError> {
    lifecycle::has_project_changed(&state.pool, export).await
}
