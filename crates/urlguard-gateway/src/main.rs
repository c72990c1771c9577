//! urlguard gateway
//!
//! - Loads `URLGUARD_CONFIG` (default `urlguard.yaml`)
//! - Publishes the configured rules
//! - Serves built-in routes behind the URL filter

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use urlguard_core::error::{Result, UrlGuardError};
use urlguard_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "urlguard-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "urlguard-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| UrlGuardError::Internal(format!("bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| UrlGuardError::Internal(format!("server failed: {e}")))
}
