//! Ownership-based authorization checks.
//!
//! A user may view or mutate a project (and its pages and exports) only as
//! its owner or with an admin role. Denials use one constant message so the
//! response shape never leaks whether the resource exists.

use seobuilder_core::error::CoreError;
use seobuilder_core::roles::is_admin;
use seobuilder_db::models::project::Project;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Whether `user` may read the project and its child resources.
pub fn can_view(user: &AuthUser, project: &Project) -> bool {
    user.user_id == project.user_id || is_admin(&user.role)
}

/// Whether `user` may mutate or delete the project and its child resources.
pub fn can_modify(user: &AuthUser, project: &Project) -> bool {
    user.user_id == project.user_id || is_admin(&user.role)
}

/// Authorize a read, rejecting with a constant-shape 403.
pub fn authorize_view(user: &AuthUser, project: &Project) -> Result<(), AppError> {
    if can_view(user, project) {
        Ok(())
    } else {
        Err(denied())
    }
}

/// Authorize a mutation, rejecting with a constant-shape 403.
pub fn authorize_modify(user: &AuthUser, project: &Project) -> Result<(), AppError> {
    if can_modify(user, project) {
        Ok(())
    } else {
        Err(denied())
    }
}

fn denied() -> AppError {
    AppError::Core(CoreError::Forbidden("This action is unauthorized".into()))
}
