//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seobuilder_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
///
/// `password_hash` is intentionally excluded from serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    /// Defaults to `owner` if omitted.
    pub role: Option<String>,
}
