//! Handler for applying an archetype to a project.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use seobuilder_core::types::DbId;

use crate::engine::archetypes::apply_to_project;
use crate::error::{AppError, AppResult};
use crate::handlers::ensure_project_exists;
use crate::middleware::rbac::RequireContentManager;
use crate::policy::authorize_modify;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/archetypes/{name}
// ---------------------------------------------------------------------------

/// Instantiate a named archetype into a project.
///
/// Requires an `Idempotency-Key` header; repeating a request with the same
/// key replays the original result instead of creating pages again.
pub async fn apply(
    State(state): State<AppState>,
    RequireContentManager(user): RequireContentManager,
    Path((project_id, name)): Path<(DbId, String)>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    authorize_modify(&user, &project)?;

    let idempotency_key = headers
        .get("idempotency-key")
        .and_then(|v| v.to_str().ok())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::BadRequest("Idempotency-Key header is required".into()))?;

    let pages = apply_to_project(&state, &project, &name, idempotency_key).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: pages })))
}
