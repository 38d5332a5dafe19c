//! Handlers for project exports: create, list, inspect, download, delete.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use seobuilder_core::error::CoreError;
use seobuilder_core::pagination::{clamp_limit, clamp_offset};
use seobuilder_core::types::{DbId, Timestamp};
use seobuilder_db::models::project_export::ProjectExport;
use seobuilder_db::repositories::ProjectExportRepo;

use crate::engine::exports as engine;
use crate::error::{AppError, AppResult};
use crate::handlers::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response DTO
// ---------------------------------------------------------------------------

/// Export representation returned by the API, with the status name and
/// derived fields resolved.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub id: DbId,
    pub project_id: DbId,
    pub export_type: String,
    pub status: String,
    pub file_size: Option<i64>,
    pub file_size_formatted: String,
    pub download_count: i64,
    pub last_downloaded_at: Option<Timestamp>,
    pub is_ready: bool,
    pub has_project_changed: bool,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ExportResponse {
    fn build(export: &ProjectExport, has_changed: bool) -> Self {
        Self {
            id: export.id,
            project_id: export.project_id,
            export_type: export.export_type.clone(),
            status: export
                .status()
                .map(|s| s.name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            file_size: export.file_size,
            file_size_formatted: format_file_size(export.file_size),
            download_count: export.download_count,
            last_downloaded_at: export.last_downloaded_at,
            is_ready: export.is_ready(Utc::now()),
            has_project_changed: has_changed,
            error_message: export.error_message.clone(),
            created_at: export.created_at,
            updated_at: export.updated_at,
        }
    }
}

/// Render a byte count as a human-readable size, `"Unknown"` when absent.
fn format_file_size(size: Option<i64>) -> String {
    let Some(size) = size else {
        return "Unknown".to_string();
    };

    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{} {}", (value * 100.0).round() / 100.0, UNITS[unit])
}

/// Verify that an export exists, returning the full row.
async fn ensure_export_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<ProjectExport> {
    ProjectExportRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProjectExport",
            id,
        }))
}

/// Authorize access to an export through its owning project.
async fn authorize_export(
    state: &AppState,
    auth: &AuthUser,
    export: &ProjectExport,
    modify: bool,
) -> AppResult<()> {
    let project = ensure_project_exists(&state.pool, export.project_id).await?;
    if modify {
        crate::policy::authorize_modify(auth, &project)
    } else {
        crate::policy::authorize_view(auth, &project)
    }
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/exports
// ---------------------------------------------------------------------------

/// List a project's exports, most recent first.
pub async fn list_by_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    crate::policy::authorize_view(&auth, &project)?;

    let limit = clamp_limit(params.limit, 50, 200);
    let offset = clamp_offset(params.offset);
    let exports =
        ProjectExportRepo::list_by_project(&state.pool, project_id, limit, offset).await?;

    let mut items = Vec::with_capacity(exports.len());
    for export in &exports {
        let has_changed = engine::has_project_changed(&state, export).await?;
        items.push(ExportResponse::build(export, has_changed));
    }

    tracing::debug!(count = items.len(), project_id, "Listed exports");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/exports
// ---------------------------------------------------------------------------

/// Start a new export. Responds 202: the record is `pending` and the
/// packaging job runs in the background.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    crate::policy::authorize_modify(&auth, &project)?;

    let export = engine::create_export(&state, &project).await?;
    tracing::info!(export_id = export.id, project_id, "Export started");

    let response = ExportResponse::build(&export, false);
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: response })))
}

// ---------------------------------------------------------------------------
// GET /exports/{id}
// ---------------------------------------------------------------------------

/// Get a single export by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let export = ensure_export_exists(&state.pool, id).await?;
    authorize_export(&state, &auth, &export, false).await?;

    let has_changed = engine::has_project_changed(&state, &export).await?;
    Ok(Json(DataResponse {
        data: ExportResponse::build(&export, has_changed),
    }))
}

// ---------------------------------------------------------------------------
// GET /exports/{id}/download
// ---------------------------------------------------------------------------

/// Download a ready export's archive.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let export = ensure_export_exists(&state.pool, id).await?;
    authorize_export(&state, &auth, &export, false).await?;

    let (bytes, filename) = engine::download_export(&state, &export).await?;
    tracing::info!(export_id = id, bytes = bytes.len(), "Export downloaded");

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes))
}

// ---------------------------------------------------------------------------
// DELETE /exports/{id}
// ---------------------------------------------------------------------------

/// Delete an export and its backing artifact.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let export = ensure_export_exists(&state.pool, id).await?;
    authorize_export(&state, &auth, &export, true).await?;

    engine::delete_export(&state, &export).await?;
    tracing::info!(export_id = id, "Export deleted");
    Ok(StatusCode::NO_CONTENT)
}
