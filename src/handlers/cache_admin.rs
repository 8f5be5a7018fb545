//! Cache administration handlers

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::cache::CACHE_PREFIX;
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Serialize)]
pub struct ClearResponse {
    status: &'static str,
    message: String,
    timestamp: String,
}

/// POST /api/cache/clear
///
/// Drops every cached prediction. Works whenever Redis is configured, even
/// if serving-path caching is switched off; without Redis it is a client
/// error rather than a silent no-op. Backend failures surface as 500 here,
/// unlike the fail-open serving path.
pub async fn clear(State(state): State<AppState>) -> AppResult<Json<ClearResponse>> {
    let store = state
        .cache_store()
        .ok_or_else(|| AppError::BadRequest("Redis not configured".into()))?;

    let removed = store.clear_prefix(CACHE_PREFIX).await?;
    tracing::info!("Cleared {} cache entries", removed);

    Ok(Json(ClearResponse {
        status: "ok",
        message: format!("Cleared {} cache entries", removed),
        timestamp: Utc::now().to_rfc3339(),
    }))
}
