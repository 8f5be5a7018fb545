//! Wire types for the prediction endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ml::ModelType;

/// Per-feature attribution block returned alongside every prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanations {
    /// One row per input row, one value per feature, aligned with
    /// `feature_names`.
    pub shap_values: Vec<Vec<f32>>,
    pub feature_names: Vec<String>,
    /// Model output at the baseline input; attributions are offsets from it.
    pub base_value: f32,
}

/// The cacheable part of a prediction response. This is exactly what gets
/// serialized into the response cache; per-request fields live on
/// [`PredictionResponse`] so a cache hit can report its own timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBody {
    pub predictions: Vec<f32>,
    pub explanations: Explanations,
    pub model_type: ModelType,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub body: PredictionBody,
    /// End-to-end handling time in seconds, measured per request even when
    /// the body came from cache.
    pub processing_time: f64,
    pub cached: bool,
}

impl PredictionResponse {
    pub fn served(body: PredictionBody, elapsed: Duration, cached: bool) -> Self {
        Self {
            body,
            processing_time: elapsed.as_secs_f64(),
            cached,
        }
    }
}
