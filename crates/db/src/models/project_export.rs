//! Project export models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seobuilder_core::types::{DbId, Timestamp};

use crate::models::status::{ExportStatus, StatusId};

/// Export type for a downloadable WordPress theme package.
pub const EXPORT_TYPE_WORDPRESS_THEME: &str = "wordpress_theme";

/// A row from the `project_exports` table.
///
/// Invariant: `file_path` is non-null iff the status is `ready`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectExport {
    pub id: DbId,
    pub project_id: DbId,
    pub export_type: String,
    pub status_id: StatusId,
    pub file_path: Option<String>,
    pub original_filename: Option<String>,
    pub file_size: Option<i64>,
    pub download_count: i64,
    pub last_downloaded_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub snapshot_sha: Option<String>,
    pub export_metadata: serde_json::Value,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectExport {
    /// The typed status, `None` only for a corrupt row.
    pub fn status(&self) -> Option<ExportStatus> {
        ExportStatus::from_id(self.status_id)
    }

    /// Whether the expiry timestamp has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|exp| exp < now)
    }

    /// Whether the artifact can be downloaded: status `ready` and not
    /// expired.
    pub fn is_ready(&self, now: Timestamp) -> bool {
        self.status() == Some(ExportStatus::Ready) && !self.is_expired(now)
    }

    /// Filename presented on download, falling back to a deterministic
    /// default when no original filename was recorded.
    pub fn download_filename(&self) -> String {
        self.original_filename
            .clone()
            .unwrap_or_else(|| format!("project-{}-export.zip", self.project_id))
    }
}

/// DTO for creating a new export record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectExport {
    pub project_id: DbId,
    pub export_type: String,
    pub snapshot_sha: String,
    pub expires_at: Option<Timestamp>,
    pub export_metadata: Option<serde_json::Value>,
}
