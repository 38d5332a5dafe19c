//! Well-known role name constants and capability helpers.
//!
//! These must match the seed data in the `users` table migration.

use crate::error::CoreError;

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_OWNER, ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER];

/// Validate that a role name is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown role '{role}'. Valid roles: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Whether a role may create or mutate projects and pages.
pub fn can_manage_content(role: &str) -> bool {
    role == ROLE_OWNER || role == ROLE_ADMIN
}

/// Whether a role carries an admin-equivalent override on ownership checks.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
