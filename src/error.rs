use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::cache::CacheError;
use crate::ml::{ModelError, ModelType};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("invalid or missing API key")]
    Unauthorized,

    #[error("model not available: {0}")]
    ModelUnavailable(ModelType),

    #[error("cache backend error: {0}")]
    Cache(#[from] CacheError),

    #[error("{message}")]
    Computation {
        error_type: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn computation(err: ModelError) -> Self {
        Self::Computation {
            error_type: err.kind(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid or missing API key" }),
            ),
            AppError::ModelUnavailable(model_type) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("Model not available: {model_type}") }),
            ),
            AppError::Cache(err) => {
                tracing::error!("Cache operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Cache backend error" }),
                )
            }
            AppError::Computation {
                error_type,
                message,
            } => {
                tracing::error!("Prediction failed ({}): {}", error_type, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": message,
                        "error_type": error_type,
                        "timestamp": Utc::now().to_rfc3339(),
                    }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_carries_message() {
        let response = AppError::BadRequest("No input data provided".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No input data provided");
    }

    #[tokio::test]
    async fn model_unavailable_names_the_type() {
        let response = AppError::ModelUnavailable(ModelType::Anomaly).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Model not available: anomaly");
    }

    #[tokio::test]
    async fn computation_failure_reports_type_and_timestamp() {
        let err = AppError::computation(ModelError::ShapeMismatch {
            expected: 6,
            got: 4,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error_type"], "ShapeMismatch");
        assert!(json["error"].as_str().unwrap().contains("model expects 6"));
        assert!(json["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn unauthorized_uses_fixed_message() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid or missing API key");
    }

    #[tokio::test]
    async fn cache_failure_hides_backend_detail() {
        let err = AppError::Cache(CacheError::Backend("connection refused".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Cache backend error");
    }
}
