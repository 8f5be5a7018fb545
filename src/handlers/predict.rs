//! Prediction orchestrator
//!
//! Request lifecycle: validate payload, resolve a model, consult the cache,
//! otherwise build features, predict, explain, and backfill the cache. Cache
//! failures never fail the request; a missing model is the caller's 404.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::cache::derive_key;
use crate::error::{AppError, AppResult};
use crate::ml::{build_features, select_model};
use crate::models::{Explanations, PredictionBody, PredictionResponse};
use crate::AppState;

/// POST /api/predict
///
/// The body is a free-form JSON object; `query` and `visualizationType`
/// steer model selection, every other field is a candidate feature. The
/// `Option<Json>` extractor turns malformed bodies into a uniform 400
/// instead of axum's default rejection.
pub async fn predict(
    State(state): State<AppState>,
    payload: Option<Json<Value>>,
) -> AppResult<Json<PredictionResponse>> {
    let started = Instant::now();

    let payload = match payload {
        Some(Json(value)) => value,
        None => return Err(AppError::BadRequest("No input data provided".into())),
    };
    let non_empty = payload.as_object().is_some_and(|map| !map.is_empty());
    if !non_empty {
        return Err(AppError::BadRequest("No input data provided".into()));
    }

    let model_type = select_model(&payload);
    let entry = state
        .registry
        .get(model_type)
        .ok_or(AppError::ModelUnavailable(model_type))?;

    let cache_key = derive_key(&payload, model_type);

    if let Some(store) = state.cache() {
        if let Some(stored) = store.get(&cache_key).await {
            match serde_json::from_str::<PredictionBody>(&stored) {
                Ok(body) => {
                    tracing::debug!("Cache hit for {}", cache_key);
                    return Ok(Json(PredictionResponse::served(
                        body,
                        started.elapsed(),
                        true,
                    )));
                }
                Err(err) => {
                    // Stale or hand-edited entry; recompute and overwrite.
                    tracing::warn!("Discarding undecodable cache entry {}: {}", cache_key, err);
                }
            }
        }
    }

    let features = build_features(&payload, &entry.feature_names);
    let predictions = entry
        .predictor
        .predict(&features)
        .map_err(AppError::computation)?;
    let shap_values = entry
        .explainer
        .shap_values(&features)
        .map_err(AppError::computation)?;

    let body = PredictionBody {
        predictions,
        explanations: Explanations {
            shap_values,
            feature_names: entry.feature_names.clone(),
            base_value: entry.explainer.expected_value(),
        },
        model_type,
    };

    if let Some(store) = state.cache() {
        match serde_json::to_string(&body) {
            Ok(serialized) => store.put(&cache_key, &serialized).await,
            Err(err) => tracing::warn!("Skipping cache write, serialization failed: {}", err),
        }
    }

    Ok(Json(PredictionResponse::served(
        body,
        started.elapsed(),
        false,
    )))
}
