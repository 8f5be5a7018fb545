//! Feature builder
//!
//! Converts an arbitrary request payload into the fixed-width numeric matrix
//! a model expects. Total and deterministic: the same payload and name list
//! always produce the same matrix, and nothing here can fail: absent or
//! non-numeric fields become the documented default of 0.0. Determinism
//! matters beyond correctness: cache keys are derived from the raw payload,
//! so two cache-equal requests must materialize identical vectors.

use ndarray::Array2;
use serde_json::Value;

/// Lower-cased query fragments that flip the `has_time_filter` feature.
const TIME_KEYWORDS: &[&str] = &["trend", "over time", "history", "past", "recent"];

/// Build a single-row feature matrix in `feature_names` order.
pub fn build_features(payload: &Value, feature_names: &[String]) -> Array2<f32> {
    let query = payload
        .get("query")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let query_lower = query.to_lowercase();

    let mut matrix = Array2::<f32>::zeros((1, feature_names.len()));
    for (column, name) in feature_names.iter().enumerate() {
        matrix[[0, column]] = match name.as_str() {
            "query_length" => query.chars().count() as f32,
            "has_time_filter" => {
                if TIME_KEYWORDS.iter().any(|k| query_lower.contains(k)) {
                    1.0
                } else {
                    0.0
                }
            }
            field => payload.get(field).map(numeric_value).unwrap_or(0.0),
        };
    }
    matrix
}

/// Coerce a JSON value to f32: numbers directly, bools as 1/0, numeric
/// strings parsed, everything else 0.0.
fn numeric_value(value: &Value) -> f32 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0) as f32,
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::String(s) => s.trim().parse::<f32>().unwrap_or(0.0),
        _ => 0.0,
    }
}
