//! Handlers for project pages.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use seobuilder_core::archetype::META_DESCRIPTION_MAX;
use seobuilder_core::error::CoreError;
use seobuilder_core::structure::{validate_slug, PageStructure};
use seobuilder_core::types::DbId;
use seobuilder_core::validation::structure::{validate_structure, StructureRules};
use seobuilder_db::models::page::{CreatePage, Page, UpdatePage};
use seobuilder_db::repositories::PageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::ensure_project_exists;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireContentManager;
use crate::policy::{authorize_modify, authorize_view};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a page exists and belongs to `project_id`.
async fn ensure_page_exists(
    pool: &sqlx::PgPool,
    project_id: DbId,
    id: DbId,
) -> AppResult<Page> {
    let page = PageRepo::find_by_id(pool, id)
        .await?
        .filter(|p| p.project_id == project_id)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Page", id }))?;
    Ok(page)
}

/// Reject a meta description longer than the SEO limit.
fn check_meta_description(meta: Option<&str>) -> AppResult<()> {
    if meta.is_some_and(|m| m.chars().count() > META_DESCRIPTION_MAX) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "meta_description must not exceed {META_DESCRIPTION_MAX} characters"
        ))));
    }
    Ok(())
}

/// Validate a supplied `page_structure` against the heading rules.
///
/// Applies only when a structure is present in the request; a page without
/// a structure is legal until one is supplied.
fn check_structure_value(value: &serde_json::Value) -> AppResult<()> {
    let structure = PageStructure::from_value(value).map_err(AppError::Core)?;
    if !validate_structure(&structure, &StructureRules::default()) {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid page structure".into(),
        )));
    }
    Ok(())
}

/// Extract and parse the `If-Match` concurrency header.
fn if_match_timestamp(headers: &HeaderMap) -> AppResult<chrono::DateTime<chrono::Utc>> {
    let raw = headers
        .get("if-match")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::BadRequest("If-Match header is required for page updates".into())
        })?;

    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&chrono::Utc))
        .map_err(|_| AppError::Core(CoreError::Conflict("Version mismatch".into())))
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/pages
// ---------------------------------------------------------------------------

/// List a project's pages ordered by id.
pub async fn list_by_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    authorize_view(&auth, &project)?;

    let items = PageRepo::list_by_project(&state.pool, project_id).await?;
    tracing::debug!(count = items.len(), project_id, "Listed pages");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /projects/{project_id}/pages
// ---------------------------------------------------------------------------

/// Create a page. A supplied structure must satisfy the heading rules.
pub async fn create(
    State(state): State<AppState>,
    RequireContentManager(user): RequireContentManager,
    Path(project_id): Path<DbId>,
    Json(body): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    authorize_modify(&user, &project)?;

    validate_slug(&body.slug).map_err(AppError::Core)?;
    check_meta_description(body.meta_description.as_deref())?;
    if let Some(structure) = &body.page_structure {
        check_structure_value(structure)?;
    }

    let created = PageRepo::create(&state.pool, project_id, &body).await?;
    tracing::info!(id = created.id, project_id, slug = %created.slug, "Page created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /projects/{project_id}/pages/{id}
// ---------------------------------------------------------------------------

/// Get a single page by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    authorize_view(&auth, &project)?;

    let page = ensure_page_exists(&state.pool, project_id, id).await?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// PUT /projects/{project_id}/pages/{id}
// ---------------------------------------------------------------------------

/// Update a page, gated on the `If-Match` last-modified timestamp.
///
/// A stale or missing timestamp is a conflict: the caller must refetch and
/// retry with the current version.
pub async fn update(
    State(state): State<AppState>,
    RequireContentManager(user): RequireContentManager,
    Path((project_id, id)): Path<(DbId, DbId)>,
    headers: HeaderMap,
    Json(body): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    authorize_modify(&user, &project)?;

    let page = ensure_page_exists(&state.pool, project_id, id).await?;

    let expected = if_match_timestamp(&headers)?;
    if expected != page.updated_at {
        return Err(AppError::Core(CoreError::Conflict("Version mismatch".into())));
    }

    if let Some(slug) = &body.slug {
        validate_slug(slug).map_err(AppError::Core)?;
    }
    check_meta_description(body.meta_description.as_deref())?;
    if let Some(structure) = &body.page_structure {
        check_structure_value(structure)?;
    }

    let updated = PageRepo::update_if_unchanged(&state.pool, id, page.updated_at, &body)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Version mismatch".into())))?;

    tracing::info!(id, project_id, "Page updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /projects/{project_id}/pages/{id}
// ---------------------------------------------------------------------------

/// Delete a page.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let project = ensure_project_exists(&state.pool, project_id).await?;
    authorize_modify(&auth, &project)?;

    ensure_page_exists(&state.pool, project_id, id).await?;
    PageRepo::delete(&state.pool, id).await?;
    tracing::info!(id, project_id, "Page deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_match_header_parses_rfc3339() {
        let mut headers = HeaderMap::new();
        headers.insert("if-match", "2026-01-01T00:00:00+00:00".parse().unwrap());
        let ts = if_match_timestamp(&headers).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn missing_if_match_is_bad_request() {
        let headers = HeaderMap::new();
        assert!(matches!(
            if_match_timestamp(&headers),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn garbage_if_match_is_a_conflict() {
        let mut headers = HeaderMap::new();
        headers.insert("if-match", "not-a-timestamp".parse().unwrap());
        assert!(matches!(
            if_match_timestamp(&headers),
            Err(AppError::Core(CoreError::Conflict(_)))
        ));
    }

    #[test]
    fn overlong_meta_description_rejected() {
        let long = "x".repeat(META_DESCRIPTION_MAX + 1);
        assert!(check_meta_description(Some(&long)).is_err());
        assert!(check_meta_description(Some("fine")).is_ok());
        assert!(check_meta_description(None).is_ok());
    }
}
