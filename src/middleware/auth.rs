//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppError, AppState};

/// Header carrying the client credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware: require a matching API key on protected routes.
/// When no key is configured the check is disabled and every request passes.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config.api_key.as_deref() {
        let presented = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        if presented != Some(expected) {
            tracing::warn!(
                "Rejected request to {} with invalid API key",
                req.uri().path()
            );
            return Err(AppError::Unauthorized);
        }
    }

    Ok(next.run(req).await)
}
