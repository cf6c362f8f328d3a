//! Store health checks and the HTTP endpoint that reports them to the monitoring service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod snapshot;

pub use crate::config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use health::{Check, CheckReport, CheckResult, CheckRunner, CheckStatus, Verdict};
pub use snapshot::PlatformSnapshot;

use axum::Router;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub snapshot_path: PathBuf,
    pub secret: Option<String>,
    pub disabled_checks: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            app_name: "Store Health Checks".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            snapshot_path: snapshot_path.into(),
            secret: None,
            disabled_checks: Arc::new(Vec::new()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.snapshot.path.clone())
            .with_secret(config.report.secret.clone())
            .with_disabled_checks(config.report.disabled_checks.clone())
    }

    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret;
        self
    }

    pub fn with_disabled_checks(mut self, disabled_checks: Vec<String>) -> Self {
        self.disabled_checks = Arc::new(disabled_checks);
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    let router = create_routes(state.clone()).with_state(state);
    middleware::logging::with_request_tracing(router)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting health endpoint on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
