//! GeoPulse ML Prediction Service
//!
//! Serves predictions with SHAP-style explanations for the GeoPulse
//! analytics dashboard.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  GEOPULSE ML SERVICE                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌───────────┐   ┌───────────────────────┐ │
//! │  │  API     │   │  Model    │   │  Response Cache       │ │
//! │  │  (Axum)  │──▶│  Registry │   │  (Redis, fail-open)   │ │
//! │  └──────────┘   └─────┬─────┘   └───────────┬───────────┘ │
//! │                       ▼                     ▼              │
//! │        predictor + explainer         pred:<sha256> keys    │
//! │        per model type                TTL-bounded bodies    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! A request to `/api/predict` resolves a model type from its payload,
//! builds a feature matrix, and answers with predictions, per-feature
//! attributions, and timing. Identical payloads are served from Redis
//! when caching is configured; a dead cache never fails a request.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod ml;
pub mod models;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use cache::CacheStore;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use ml::ModelRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub cache: Option<CacheStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(registry: ModelRegistry, cache: Option<CacheStore>, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            cache,
            config,
        }
    }

    /// Cache as seen by the serving path: `None` when Redis is unconfigured
    /// or caching is switched off.
    pub fn cache(&self) -> Option<&CacheStore> {
        if self.config.cache_enabled {
            self.cache.as_ref()
        } else {
            None
        }
    }

    /// Cache whenever Redis is configured, ignoring the serving switch.
    /// Health checks and admin operations go through here.
    pub fn cache_store(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health::check))
        .route("/ping", get(handlers::health::ping));

    // Serving and admin routes (API key auth when one is configured)
    let protected_routes = Router::new()
        .route("/api/predict", post(handlers::predict::predict))
        .route("/api/cache/clear", post(handlers::cache_admin::clear))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
