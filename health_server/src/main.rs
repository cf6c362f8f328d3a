//! Main entry point for the health check endpoint binary

use anyhow::Result;
use checks_lib::{create_app, run_server, AppConfig, AppState, CheckRunner, PlatformSnapshot};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Endpoint will bind to: {}", config.bind_address());
    info!("Platform snapshot: {}", config.snapshot.path.display());

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    // The snapshot is reloaded per request; this only surfaces a bad path early.
    match PlatformSnapshot::load(&config.snapshot.path).await {
        Ok(snapshot) => {
            let disabled = &config.report.disabled_checks;
            let runner = CheckRunner::from_snapshot(Arc::new(snapshot), disabled);
            info!("Registered checks: {}", runner.check_names().join(", "));
        }
        Err(e) => {
            warn!("Platform snapshot not readable yet, requests will fail until it is: {}", e);
        }
    }

    let state = AppState::from_config(&config);
    info!("App: {} v{}", state.app_name, state.version);

    let app = create_app(state);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            format!(
                "{}={},checks_lib={},tower_http=debug",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                default_level,
                default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
