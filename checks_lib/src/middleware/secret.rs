//! Shared-secret verification for the monitoring service's requests

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

pub const SECRET_HEADER: &str = "oh-dear-health-check-secret";

/// Rejects requests whose secret header does not match the configured one.
/// Without a configured secret every request passes.
pub async fn health_secret_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.secret.as_deref() {
        match extract_secret(request.headers()) {
            Some(provided) if secrets_match(provided, expected) => {}
            Some(_) => {
                tracing::warn!("Rejected health request with an invalid secret");
                return Err(AppError::Unauthorized);
            }
            None => {
                tracing::warn!("Rejected health request without a secret header");
                return Err(AppError::Unauthorized);
            }
        }
    }

    Ok(next.run(request).await)
}

fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn extract_secret(headers: &HeaderMap) -> Option<&str> {
    headers.get(SECRET_HEADER).and_then(|value| value.to_str().ok())
}
