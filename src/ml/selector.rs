//! Model selector
//!
//! Resolves which registered model a request should use. An ordered rule
//! list over the lower-cased free-text query runs first, then the
//! `visualizationType` hint, then the default, so the function is total and
//! a pure function of the payload. Purity is load-bearing: the resolved type
//! feeds cache-key derivation.

use serde_json::Value;

use super::model_type::ModelType;

/// Keyword rules in priority order; first match wins.
const KEYWORD_RULES: &[(&[&str], ModelType)] = &[
    (
        &["predict", "forecast", "projection", "estimate"],
        ModelType::Prediction,
    ),
    (
        &["anomal", "outlier", "unusual", "deviation"],
        ModelType::Anomaly,
    ),
    (
        &["correlat", "relationship", "association"],
        ModelType::Correlation,
    ),
    (
        &["network", "flow", "connectivity", "route"],
        ModelType::Network,
    ),
    (
        &["multivariate", "multi-factor", "combined"],
        ModelType::Multivariate,
    ),
];

/// Fallback when neither the query nor the hint resolves.
pub const DEFAULT_MODEL: ModelType = ModelType::Hotspot;

/// Resolve the model type for a request payload.
pub fn select_model(payload: &Value) -> ModelType {
    let query = payload
        .get("query")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();

    for (keywords, model) in KEYWORD_RULES {
        if keywords.iter().any(|k| query.contains(k)) {
            return *model;
        }
    }

    if let Some(hint) = payload.get("visualizationType").and_then(Value::as_str) {
        if let Ok(model) = hint.parse::<ModelType>() {
            return model;
        }
    }

    DEFAULT_MODEL
}
