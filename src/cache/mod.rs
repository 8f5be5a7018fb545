//! Response caching: deterministic key derivation plus a fail-open Redis store.

pub mod key;
pub mod store;

pub use key::{derive_key, CACHE_PREFIX};
pub use store::{CacheBackend, CacheError, CacheStore, RedisBackend};
