//! Connection-closed adapter.
//!
//! The transport reports every closed socket; the listener turns the ones
//! that had joined a room into a relay disconnect.

use std::sync::Arc;

use tracing::debug;

use codecollab_core::protocol::{RoomId, SessionId};

use crate::realtime::RelayController;

/// Transport notification that a connection is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionClosed {
    /// Transport-local connection id, for logging.
    pub conn_id: u64,
    /// Relay session bound to the connection, if it joined.
    pub session_id: Option<SessionId>,
    /// Room associated with the connection, if known.
    pub room_id: Option<RoomId>,
}

/// Callback the transport invokes for each closed connection.
pub trait DisconnectHandler: Send + Sync {
    fn on_connection_closed(&self, event: ConnectionClosed);
}

pub struct DisconnectListener {
    relay: Arc<RelayController>,
}

impl DisconnectListener {
    pub fn new(relay: Arc<RelayController>) -> Self {
        Self { relay }
    }
}

impl DisconnectHandler for DisconnectListener {
    fn on_connection_closed(&self, event: ConnectionClosed) {
        match (event.session_id, event.room_id) {
            (Some(session_id), Some(room_id)) => {
                self.relay.handle_disconnect(&session_id, &room_id);
            }
            _ => debug!(conn = event.conn_id, "closed connection had no room; nothing to do"),
        }
    }
}
