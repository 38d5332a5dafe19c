//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use seobuilder_core::types::DbId;
use seobuilder_db::models::project::{CreateProject, UpdateProject};
use seobuilder_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::handlers::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireContentManager;
use crate::policy::{authorize_modify, authorize_view};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /projects
// ---------------------------------------------------------------------------

/// List the authenticated user's projects.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<impl IntoResponse> {
    let items = ProjectRepo::list_by_user(&state.pool, auth.user_id).await?;
    tracing::debug!(count = items.len(), user_id = auth.user_id, "Listed projects");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /projects
// ---------------------------------------------------------------------------

/// Create a new project owned by the authenticated user.
pub async fn create(
    State(state): State<AppState>,
    RequireContentManager(user): RequireContentManager,
    Json(body): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    let created = ProjectRepo::create(&state.pool, user.user_id, &body).await?;
    tracing::info!(id = created.id, user_id = user.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /projects/{id}
// ---------------------------------------------------------------------------

/// Get a single project by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, id).await?;
    authorize_view(&auth, &project)?;
    Ok(Json(DataResponse { data: project }))
}

// ---------------------------------------------------------------------------
// PUT /projects/{id}
// ---------------------------------------------------------------------------

/// Update a project's name, keywords, or settings.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, id).await?;
    authorize_modify(&auth, &project)?;

    let updated = ProjectRepo::update(&state.pool, id, &body).await?.ok_or(
        crate::error::AppError::Core(seobuilder_core::error::CoreError::NotFound {
            entity: "Project",
            id,
        }),
    )?;
    tracing::info!(id, "Project updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /projects/{id}
// ---------------------------------------------------------------------------

/// Delete a project, cascading to its pages and exports.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let project = ensure_project_exists(&state.pool, id).await?;
    authorize_modify(&auth, &project)?;

    ProjectRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
