//! Health and liveness handlers

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::ml::ModelType;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    /// Model types that loaded successfully at startup
    models: Vec<ModelType>,
    redis: RedisHealth,
    environment: EnvironmentInfo,
}

#[derive(Serialize)]
struct RedisHealth {
    /// "ok", "error", or "not_configured"
    status: &'static str,
    cache_enabled: bool,
}

#[derive(Serialize)]
struct EnvironmentInfo {
    debug: bool,
}

/// Full health report. Always answers 200; degraded dependencies show up
/// in the body, never as a failed health check.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let redis_status = match state.cache_store() {
        Some(store) => store.status().await,
        None => "not_configured",
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        models: state.registry.loaded_types(),
        redis: RedisHealth {
            status: redis_status,
            cache_enabled: state.config.cache_enabled,
        },
        environment: EnvironmentInfo {
            debug: state.config.debug,
        },
    })
}

#[derive(Serialize)]
pub struct PingResponse {
    status: &'static str,
    timestamp: String,
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}
