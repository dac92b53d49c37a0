//! codecollab gateway
//!
//! - WebSocket endpoint (default `/ws`): join / code-change / sync-code / leave
//! - `GET /health`: live session and room counts
//! - Config: `codecollab.yaml`, or the path given as the first argument

use tracing_subscriber::{fmt, EnvFilter};

use codecollab_core::error::{CodeCollabError, Result};
use codecollab_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.gateway.listen_addr()?;
    let ws_path = cfg.gateway.ws_path.clone();

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state.clone());

    tracing::info!(%listen, %ws_path, "codecollab-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CodeCollabError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CodeCollabError::Internal(format!("server failed: {e}")))?;

    state.shutdown();
    tracing::info!("codecollab-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed; shutting down");
    }
}
