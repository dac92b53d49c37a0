//! Shared application state for the codecollab gateway.
//!
//! Builds the relay state once, wires the connection hub in as the relay's
//! egress, and registers the disconnect listener the transport reports to.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::realtime::{DisconnectHandler, DisconnectListener, Egress, RelayController, RelayState};
use crate::transport::handshake::OriginGuard;
use crate::transport::ConnectionHub;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    origin_guard: OriginGuard,
    relay_state: Arc<RelayState>,
    hub: Arc<ConnectionHub>,
    dispatcher: Arc<Dispatcher>,
    disconnect: Arc<dyn DisconnectHandler>,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        let relay_state = Arc::new(RelayState::new());
        let hub = Arc::new(ConnectionHub::new());
        let egress: Arc<dyn Egress> = hub.clone();
        let relay = Arc::new(RelayController::new(Arc::clone(&relay_state), egress));

        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&relay), Arc::clone(&hub)));
        let disconnect: Arc<dyn DisconnectHandler> = Arc::new(DisconnectListener::new(relay));
        let origin_guard = OriginGuard::new(cfg.gateway.allowed_origins.clone());

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                origin_guard,
                relay_state,
                hub,
                dispatcher,
                disconnect,
            }),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn origin_guard(&self) -> &OriginGuard {
        &self.inner.origin_guard
    }

    pub fn relay_state(&self) -> &RelayState {
        &self.inner.relay_state
    }

    pub fn hub(&self) -> Arc<ConnectionHub> {
        Arc::clone(&self.inner.hub)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.inner.dispatcher)
    }

    pub fn disconnect_handler(&self) -> Arc<dyn DisconnectHandler> {
        Arc::clone(&self.inner.disconnect)
    }

    /// Clear all relay state. Called once the server has stopped serving.
    pub fn shutdown(&self) {
        self.inner.relay_state.shutdown();
    }
}
