//! Repository for the `pages` table.

use sqlx::{PgExecutor, PgPool};

use seobuilder_core::snapshot::PageFingerprint;
use seobuilder_core::types::{DbId, Timestamp};

use crate::models::page::{CreatePage, Page, UpdatePage};

const COLUMNS: &str = "id, project_id, page_type, slug, title, meta_description, \
     page_structure, seo_data, ai_generated_content, created_at, updated_at";

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page scoped to `project_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreatePage,
    ) -> Result<Page, sqlx::Error> {
        Self::create_with(pool, project_id, input).await
    }

    /// Insert a new page using any executor.
    ///
    /// The archetype applier passes a transaction here so a whole blueprint
    /// application commits or rolls back as one unit.
    pub async fn create_with<'e, E>(
        executor: E,
        project_id: DbId,
        input: &CreatePage,
    ) -> Result<Page, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO pages
                (project_id, page_type, slug, title, meta_description,
                 page_structure, seo_data, ai_generated_content)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(project_id)
            .bind(&input.page_type)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.meta_description)
            .bind(&input.page_structure)
            .bind(&input.seo_data)
            .bind(&input.ai_generated_content)
            .fetch_one(executor)
            .await
    }

    /// Find a page by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's pages ordered by id.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Page>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a page, gated on the caller's last-known `updated_at`.
    ///
    /// Returns `None` when the row does not exist or the timestamp does not
    /// match (the caller maps the mismatch to a conflict). Only non-`None`
    /// fields in `input` are applied.
    pub async fn update_if_unchanged(
        pool: &PgPool,
        id: DbId,
        expected_updated_at: Timestamp,
        input: &UpdatePage,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                page_type = COALESCE($3, page_type),
                slug = COALESCE($4, slug),
                title = COALESCE($5, title),
                meta_description = COALESCE($6, meta_description),
                page_structure = COALESCE($7, page_structure),
                seo_data = COALESCE($8, seo_data),
                ai_generated_content = COALESCE($9, ai_generated_content),
                updated_at = NOW()
             WHERE id = $1 AND updated_at = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(expected_updated_at)
            .bind(&input.page_type)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.meta_description)
            .bind(&input.page_structure)
            .bind(&input.seo_data)
            .bind(&input.ai_generated_content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a page by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load the snapshot fingerprints for a project's pages, ordered by id.
    ///
    /// This is the input to the export staleness digest; the field set and
    /// ordering are part of the digest contract.
    pub async fn fingerprints(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<PageFingerprint>, sqlx::Error> {
        let rows: Vec<(DbId, String, String, Option<serde_json::Value>, Timestamp)> =
            sqlx::query_as(
                "SELECT id, title, slug, page_structure, updated_at
                 FROM pages WHERE project_id = $1 ORDER BY id",
            )
            .bind(project_id)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, slug, structure, updated_at)| PageFingerprint {
                id,
                title,
                slug,
                structure,
                updated_at: updated_at.to_rfc3339(),
            })
            .collect())
    }
}
