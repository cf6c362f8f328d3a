//! Check report handlers

use crate::{
    error::{AppError, Result},
    health::CheckRunner,
    snapshot::PlatformSnapshot,
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

/// Builds a runner over the platform state as it is on disk right now.
async fn fresh_runner(state: &AppState) -> Result<CheckRunner> {
    let snapshot = PlatformSnapshot::load(&state.snapshot_path)
        .await
        .map_err(|e| match e {
            AppError::IoError(err) => AppError::Snapshot(format!(
                "cannot read {}: {}",
                state.snapshot_path.display(),
                err
            )),
            other => other,
        })?;

    Ok(CheckRunner::from_snapshot(Arc::new(snapshot), &state.disabled_checks))
}

pub async fn handle_health(State(state): State<AppState>) -> Result<impl IntoResponse> {
    info!("GET /health - Running health checks");

    let report = fresh_runner(&state).await?.run_all();
    Ok(Json(report))
}

pub async fn handle_check(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    info!("GET /health/{} - Running single check", name);

    fresh_runner(&state)
        .await?
        .run_check(&name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Check '{}' not found", name)))
}

pub async fn handle_liveness() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now().timestamp()
    })))
}
