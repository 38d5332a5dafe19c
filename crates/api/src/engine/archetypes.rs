//! Idempotency-gated archetype application.

use seobuilder_core::archetype::validate_archetype;
use seobuilder_core::error::CoreError;
use seobuilder_core::idempotency::{archetype_key, Claim};
use seobuilder_db::models::page::Page;
use seobuilder_db::models::project::Project;

use crate::engine::pages::create_page_from_blueprint;
use crate::state::AppState;

/// Apply a named archetype to a project, creating one page per blueprint.
///
/// At-most-once per `(project, idempotency_key)` within the cache TTL:
/// a replay returns the cached page list without touching the database, and
/// a concurrent duplicate while the first request is still executing is
/// rejected as a conflict. Page creation runs inside a single transaction
/// so a mid-loop validation failure leaves zero pages behind.
pub async fn apply_to_project(
    state: &AppState,
    project: &Project,
    archetype_name: &str,
    idempotency_key: &str,
) -> Result<Vec<Page>, CoreError> {
    let cache_key = archetype_key(project.id, idempotency_key);

    match state.idempotency.claim(&cache_key) {
        Claim::Replay(pages) => {
            tracing::info!(
                project_id = project.id,
                key = idempotency_key,
                "Idempotent archetype request replayed"
            );
            return Ok(pages);
        }
        Claim::InFlight => {
            return Err(CoreError::Conflict(
                "A request with this idempotency key is already in progress".into(),
            ));
        }
        Claim::Acquired => {}
    }

    match create_pages(state, project, archetype_name).await {
        Ok(pages) => {
            state.idempotency.fulfill(&cache_key, pages.clone());
            Ok(pages)
        }
        Err(e) => {
            // Free the key so the caller can retry after fixing the input.
            state.idempotency.release(&cache_key);
            Err(e)
        }
    }
}

async fn create_pages(
    state: &AppState,
    project: &Project,
    archetype_name: &str,
) -> Result<Vec<Page>, CoreError> {
    let archetype = state.catalog.get(archetype_name);

    let violations = validate_archetype(archetype);
    if !violations.is_empty() {
        return Err(CoreError::from_violations(&violations));
    }

    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;

    let mut pages = Vec::with_capacity(archetype.pages.len());
    for blueprint in &archetype.pages {
        let page = create_page_from_blueprint(&mut *tx, project.id, blueprint).await?;
        pages.push(page);
    }

    tx.commit()
        .await
        .map_err(|e| CoreError::Internal(e.to_string()))?;

    tracing::info!(
        project_id = project.id,
        archetype = %archetype.name,
        pages = pages.len(),
        "Archetype applied to project"
    );

    Ok(pages)
}
