//! GeoPulse ML Prediction Service entry point

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geopulse_ml::{create_router, AppState, CacheStore, Config, ModelRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let default_filter = if config.debug {
        "geopulse_ml=debug,tower_http=debug"
    } else {
        "geopulse_ml=info,tower_http=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("GeoPulse ML service starting...");

    // Load model artifacts; a failed model is skipped, not fatal
    let registry = ModelRegistry::load(&config.model_dir);
    if registry.is_empty() {
        tracing::warn!(
            "No models loaded from {}; predictions will return 404 until artifacts are provided",
            config.model_dir.display()
        );
    }

    // Response cache is optional; the service runs uncached without Redis
    let cache = match config.redis_url.as_deref() {
        Some(url) => match CacheStore::connect(url, config.redis_timeout, config.cache_ttl) {
            Ok(store) => {
                tracing::info!(
                    "Response cache configured (ttl {}s, enabled: {})",
                    config.cache_ttl.as_secs(),
                    config.cache_enabled
                );
                Some(store)
            }
            Err(err) => {
                tracing::warn!("Invalid REDIS_URL, running without cache: {}", err);
                None
            }
        },
        None => {
            tracing::info!("REDIS_URL not set, running without response cache");
            None
        }
    };

    // Build application state and router
    let port = config.port;
    let state = AppState::new(registry, cache, config);
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
