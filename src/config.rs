//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API key required on protected routes; `None` disables auth
    pub api_key: Option<String>,

    /// Verbose diagnostics (debug log level, startup detail)
    pub debug: bool,

    /// Redis connection URL; `None` runs the service without a cache
    pub redis_url: Option<String>,

    /// Connect and per-command timeout for cache operations
    pub redis_timeout: Duration,

    /// TTL for cached prediction responses
    pub cache_ttl: Duration,

    /// Master switch for cache reads/writes on the serving path
    pub cache_enabled: bool,

    /// Server port
    pub port: u16,

    /// Directory holding model artifact files
    pub model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),

            debug: env_flag("DEBUG", false),

            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),

            redis_timeout: Duration::from_secs(
                env::var("REDIS_TIMEOUT")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(2),
            ),

            cache_ttl: Duration::from_secs(
                env::var("REDIS_CACHE_TTL")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(3600),
            ),

            cache_enabled: env_flag("CACHE_ENABLED", true),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models")),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => is_truthy(&value),
        Err(_) => default,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}
