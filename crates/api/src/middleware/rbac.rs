//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use seobuilder_core::error::CoreError;
use seobuilder_core::roles::can_manage_content;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a content-management role (`owner` or `admin`). Rejects with
/// 403 Forbidden otherwise.
///
/// ```ignore
/// async fn create(RequireContentManager(user): RequireContentManager) -> AppResult<Json<()>> {
///     // user is guaranteed to hold owner or admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireContentManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireContentManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_manage_content(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "This action is unauthorized".into(),
            )));
        }
        Ok(RequireContentManager(user))
    }
}
