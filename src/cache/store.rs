//! Response cache store
//!
//! `CacheBackend` is the pluggable key-value contract; `RedisBackend` is the
//! production implementation. `CacheStore` wraps a backend with the serving
//! policy: reads and writes fail open (a broken backend degrades to a miss
//! or a skipped write, never a request failure), while the admin bulk-clear
//! surfaces its error. Connection establishment is lazy and retried, so a
//! backend that was down at boot starts serving hits once it comes back.

use std::sync::Arc;
use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("{0}")]
    Backend(String),
}

/// Key-value contract the store drives. TTL is passed per write; expiry is
/// the backend's job.
#[axum::async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
    /// Delete every key under `prefix`, returning how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
    async fn ping(&self) -> Result<(), CacheError>;
}

// ============================================================================
// REDIS BACKEND
// ============================================================================

pub struct RedisBackend {
    client: redis::Client,
    manager: RwLock<Option<ConnectionManager>>,
    timeout: Duration,
}

impl RedisBackend {
    /// Parse the URL and prepare a lazy connection. No I/O happens here.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            manager: RwLock::new(None),
            timeout,
        })
    }

    /// Shared connection manager, established on first use. Both connect and
    /// per-command response are bounded by the configured timeout so a slow
    /// backend cannot stall the serving path.
    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        if let Some(manager) = self.manager.read().await.as_ref() {
            return Ok(manager.clone());
        }
        let mut slot = self.manager.write().await;
        if let Some(manager) = slot.as_ref() {
            return Ok(manager.clone());
        }
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(self.timeout)
            .set_response_timeout(self.timeout)
            .set_number_of_retries(1);
        let manager = self
            .client
            .get_connection_manager_with_config(config)
            .await?;
        *slot = Some(manager.clone());
        Ok(manager)
    }
}

#[axum::async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        // SET EX rejects 0; clamp so a sub-second TTL still expires.
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut conn = self.connection().await?;
        let pattern = format!("{prefix}*");
        let mut removed = 0u64;
        let mut cursor = 0u64;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await?;
            if !keys.is_empty() {
                let deleted: u64 = conn.del(&keys).await?;
                removed += deleted;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

// ============================================================================
// FAIL-OPEN STORE
// ============================================================================

#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl CacheStore {
    pub fn connect(url: &str, timeout: Duration, ttl: Duration) -> Result<Self, CacheError> {
        Ok(Self::with_backend(
            Arc::new(RedisBackend::new(url, timeout)?),
            ttl,
        ))
    }

    pub fn with_backend(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Fail-open read: a backend error degrades to a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::warn!("Cache read failed, treating as miss: {}", err);
                None
            }
        }
    }

    /// Best-effort write: a backend error is logged and dropped.
    pub async fn put(&self, key: &str, value: &str) {
        if let Err(err) = self.backend.set(key, value, self.ttl).await {
            tracing::warn!("Cache write failed, skipping: {}", err);
        }
    }

    /// Admin bulk clear. Unlike the serving path, failure surfaces here.
    pub async fn clear_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        self.backend.delete_prefix(prefix).await
    }

    /// Live reachability check for the health endpoint.
    pub async fn status(&self) -> &'static str {
        match self.backend.ping().await {
            Ok(()) => "ok",
            Err(err) => {
                tracing::debug!("Cache ping failed: {}", err);
                "error"
            }
        }
    }
}
