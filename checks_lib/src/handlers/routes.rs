//! Route table

use super::health::{handle_check, handle_health, handle_liveness};
use crate::{
    health::checks::ALL_CHECK_NAMES, middleware::secret::health_secret_middleware, AppState,
};
use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

pub fn create_routes(state: AppState) -> Router<AppState> {
    let checks = Router::new()
        .route("/health", get(handle_health))
        .route("/health/:name", get(handle_check))
        .route_layer(middleware::from_fn_with_state(state, health_secret_middleware));

    Router::new()
        .route("/", get(handle_root))
        .route("/live", get(handle_liveness))
        .merge(checks)
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    let enabled: Vec<&str> = ALL_CHECK_NAMES
        .iter()
        .copied()
        .filter(|name| !state.disabled_checks.iter().any(|d| d == name))
        .collect();

    Json(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "checks": enabled,
        "endpoints": {
            "report": "/health",
            "check": "/health/{name}",
            "liveness": "/live"
        }
    }))
}
