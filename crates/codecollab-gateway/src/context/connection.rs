use codecollab_core::error::{CodeCollabError, Result};
use codecollab_core::protocol::{RoomId, SessionId};

use crate::realtime::ConnectionClosed;
use crate::transport::ConnId;

/// Lifecycle of one connection: `Unjoined -> Joined -> Left`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Unjoined,
    Joined { session_id: SessionId, room_id: RoomId },
    Left,
}

/// Mutable state owned by a single socket task.
#[derive(Debug)]
pub struct ConnectionContext {
    conn_id: ConnId,
    phase: Phase,
}

impl ConnectionContext {
    pub fn new(conn_id: ConnId) -> Self {
        Self {
            conn_id,
            phase: Phase::Unjoined,
        }
    }

    pub fn conn_id(&self) -> ConnId {
        self.conn_id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Session and room this connection is joined with.
    pub fn joined(&self) -> Result<(&str, &str)> {
        match &self.phase {
            Phase::Joined { session_id, room_id } => Ok((session_id.as_str(), room_id.as_str())),
            Phase::Unjoined => Err(CodeCollabError::InvalidState("join a room first")),
            Phase::Left => Err(CodeCollabError::InvalidState("connection already left")),
        }
    }

    pub fn ensure_unjoined(&self) -> Result<()> {
        match self.phase {
            Phase::Unjoined => Ok(()),
            Phase::Joined { .. } => Err(CodeCollabError::InvalidState("already joined")),
            Phase::Left => Err(CodeCollabError::InvalidState("connection already left")),
        }
    }

    pub fn mark_joined(&mut self, session_id: SessionId, room_id: RoomId) {
        self.phase = Phase::Joined { session_id, room_id };
    }

    pub fn mark_left(&mut self) {
        self.phase = Phase::Left;
    }

    /// Notification for the disconnect listener when the socket ends.
    pub fn closed_event(&self) -> ConnectionClosed {
        let (session_id, room_id) = match &self.phase {
            Phase::Joined { session_id, room_id } => {
                (Some(session_id.clone()), Some(room_id.clone()))
            }
            _ => (None, None),
        };
        ConnectionClosed {
            conn_id: self.conn_id,
            session_id,
            room_id,
        }
    }
}
