//! Axum router wiring (HTTP -> WS upgrade).
//!
//! Exposes the configured WebSocket path and a `/health` probe.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    let ws_path = state.cfg().gateway.ws_path.clone();
    Router::new()
        .route(&ws_path, get(transport::ws::ws_upgrade))
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(app): State<AppState>) -> Json<Value> {
    let stats = app.relay_state().stats();
    Json(json!({
        "status": "ok",
        "sessions": stats.sessions,
        "rooms": stats.rooms,
        "connections": app.hub().connection_count(),
        "dropped": app.hub().dropped_count(),
    }))
}
