//! Relay -> client messages.

use serde::Serialize;

use crate::error::{CodeCollabError, Result};
use crate::protocol::{Member, RoomId, SessionId};

/// Outbound message, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Someone joined; carries a fresh roster snapshot of the room.
    #[serde(rename_all = "camelCase")]
    Joined {
        clients: Vec<Member>,
        username: String,
        socket_id: SessionId,
        room_id: RoomId,
    },
    /// Editor buffer, either broadcast to a room or unicast for a resync.
    #[serde(rename_all = "camelCase")]
    CodeChange { code: String, room_id: RoomId },
    /// A session left the room.
    #[serde(rename_all = "camelCase")]
    Disconnected {
        socket_id: SessionId,
        username: String,
        room_id: RoomId,
    },
    /// Transport-level rejection of a client frame.
    Error { code: &'static str, msg: String },
}

impl ServerMessage {
    /// Build an `ERROR` reply for `err`.
    pub fn error(err: &CodeCollabError) -> Self {
        ServerMessage::Error {
            code: err.client_code().as_str(),
            msg: err.to_string(),
        }
    }

    /// Wire name of the message type, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Joined { .. } => "JOINED",
            ServerMessage::CodeChange { .. } => "CODE_CHANGE",
            ServerMessage::Disconnected { .. } => "DISCONNECTED",
            ServerMessage::Error { .. } => "ERROR",
        }
    }

    /// Serialize to a JSON text frame.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CodeCollabError::Internal(format!("json encode failed: {e}")))
    }
}
