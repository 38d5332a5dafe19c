//! Page entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seobuilder_core::types::{DbId, Timestamp};

/// A page row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub project_id: DbId,
    pub page_type: String,
    pub slug: String,
    pub title: String,
    pub meta_description: Option<String>,
    /// Component tree (see `seobuilder_core::structure`).
    pub page_structure: Option<serde_json::Value>,
    pub seo_data: Option<serde_json::Value>,
    pub ai_generated_content: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub page_type: String,
    pub slug: String,
    pub title: String,
    pub meta_description: Option<String>,
    pub page_structure: Option<serde_json::Value>,
    pub seo_data: Option<serde_json::Value>,
    pub ai_generated_content: Option<serde_json::Value>,
}

/// DTO for updating an existing page. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePage {
    pub page_type: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub page_structure: Option<serde_json::Value>,
    pub seo_data: Option<serde_json::Value>,
    pub ai_generated_content: Option<serde_json::Value>,
}
