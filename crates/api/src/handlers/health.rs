//! Liveness/readiness handler.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

/// Report service and database health.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    seobuilder_db::health_check(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
