//! Request tracing for the health endpoints

use axum::{body::Body, Router};
use http::{Request, Response};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::{info_span, Span};

/// Wraps every route in a span carrying the method, path and calling monitor.
pub fn with_request_tracing(router: Router) -> Router {
    let layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            info_span!(
                "health_request",
                method = %request.method(),
                path = %request.uri().path(),
                monitor = request
                    .headers()
                    .get(http::header::USER_AGENT)
                    .and_then(|agent| agent.to_str().ok())
                    .unwrap_or("unknown"),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::debug!("serving {} {}", request.method(), request.uri().path());
        })
        .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
            let status = response.status();
            let latency_ms = latency.as_millis();

            if status.is_success() {
                tracing::info!(
                    status = status.as_u16(),
                    latency_ms = latency_ms,
                    "health response sent"
                );
            } else if status.is_client_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    latency_ms = latency_ms,
                    "health request rejected"
                );
            } else {
                tracing::error!(
                    status = status.as_u16(),
                    latency_ms = latency_ms,
                    "health request errored"
                );
            }
        })
        .on_failure(|error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
            tracing::error!(
                latency_ms = latency.as_millis(),
                error = ?error,
                "health request failed"
            );
        });

    router.layer(layer)
}
