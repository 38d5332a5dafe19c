//! HTTP request handlers.

pub mod archetypes;
pub mod auth;
pub mod exports;
pub mod health;
pub mod pages;
pub mod projects;

use seobuilder_core::error::CoreError;
use seobuilder_core::types::DbId;
use seobuilder_db::models::project::Project;
use seobuilder_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};

/// Verify that a project exists, returning the full row.
pub(crate) async fn ensure_project_exists(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            })
        })
}
