//! Cache key derivation
//!
//! A response's cache key is the SHA-256 of the canonicalized request:
//! `{"input": <payload>, "model_type": <resolved type>}` with object keys
//! sorted recursively, so logically identical requests hash identically no
//! matter how the client ordered its JSON. Array order is preserved,
//! since arrays are positional data. Keys carry a fixed prefix so the admin
//! bulk-clear can target this service's entries alone.

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::ml::ModelType;

/// Namespace for every key this service writes.
pub const CACHE_PREFIX: &str = "pred:";

/// Derive the deterministic cache key for a payload + resolved model type.
pub fn derive_key(payload: &Value, model_type: ModelType) -> String {
    let canonical = canonicalize(&json!({
        "input": payload,
        "model_type": model_type.as_str(),
    }));
    let digest = Sha256::digest(canonical.to_string().as_bytes());
    format!("{CACHE_PREFIX}{digest:x}")
}

/// Rebuild `value` with object keys in sorted order at every level.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, inner) in entries {
                out.insert(key.clone(), canonicalize(inner));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
