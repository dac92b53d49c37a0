use std::sync::Arc;

use tracing::{debug, info, warn};

use codecollab_core::protocol::{CodeChange, Join, Leave, Member, ServerMessage, SessionId, SyncCode};

use crate::realtime::core::{RoomIndex, SessionRegistry};
use crate::realtime::types::Egress;

/// Process-wide relay state: who is connected and which room they are in.
///
/// Constructed once per server and shared by `Arc`; tests build their own.
#[derive(Default)]
pub struct RelayState {
    pub sessions: SessionRegistry,
    pub rooms: RoomIndex,
}

/// Point-in-time counts for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    pub sessions: usize,
    pub rooms: usize,
}

impl RelayState {
    pub fn new() -> Self {
        Self {
            sessions: SessionRegistry::new(),
            rooms: RoomIndex::new(),
        }
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            sessions: self.sessions.len(),
            rooms: self.rooms.room_count(),
        }
    }

    /// Drop every session and room.
    pub fn shutdown(&self) {
        let stats = self.stats();
        self.sessions.clear();
        self.rooms.clear();
        info!(sessions = stats.sessions, rooms = stats.rooms, "relay state cleared");
    }
}

/// Relay controller: turns client events into state changes and egress.
///
/// Every handler is total. Unknown sessions and rooms are no-ops, and each
/// call emits its broadcast or unicast before returning.
///
/// Roster reads are not atomic with the join that triggers them: two joins
/// racing on one room may each broadcast a roster missing the other.
pub struct RelayController {
    state: Arc<RelayState>,
    egress: Arc<dyn Egress>,
}

impl RelayController {
    pub fn new(state: Arc<RelayState>, egress: Arc<dyn Egress>) -> Self {
        Self { state, egress }
    }

    pub fn state(&self) -> &RelayState {
        &self.state
    }

    /// Register a session, add it to the room and broadcast `JOINED`.
    ///
    /// The roster is read after both mutations, so it always contains the
    /// joiner.
    pub fn handle_join(&self, req: &Join) -> SessionId {
        let identity = req.identity();
        let username = identity.username.clone();
        let session_id = self.state.sessions.register(identity);
        self.state.rooms.add_member(&req.room_id, &session_id);

        let clients = self.roster(&req.room_id);
        info!(session = %session_id, room = %req.room_id, %username, members = clients.len(), "joined");

        self.egress.send_to_room(
            &req.room_id,
            &ServerMessage::Joined {
                clients,
                username,
                socket_id: session_id.clone(),
                room_id: req.room_id.clone(),
            },
        );
        session_id
    }

    /// Rebroadcast an editor buffer to the whole room, sender included.
    pub fn handle_code_change(&self, req: &CodeChange) {
        debug!(room = %req.room_id, bytes = req.code.len(), "code change");
        self.egress.send_to_room(
            &req.room_id,
            &ServerMessage::CodeChange {
                code: req.code.clone(),
                room_id: req.room_id.clone(),
            },
        );
    }

    /// Unicast the current buffer to one session for a resync.
    pub fn handle_sync_code(&self, req: &SyncCode) {
        debug!(to = %req.socket_id, room = %req.room_id, bytes = req.code.len(), "sync code");
        self.egress.send_to_session(
            &req.socket_id,
            &ServerMessage::CodeChange {
                code: req.code.clone(),
                room_id: req.room_id.clone(),
            },
        );
    }

    pub fn handle_leave(&self, req: &Leave) {
        self.handle_disconnect(&req.socket_id, &req.room_id);
    }

    /// Tear a session down and broadcast `DISCONNECTED`.
    ///
    /// Idempotent: only the call that actually removes the session emits.
    /// The room recorded for the session wins over `room_id` when they
    /// disagree.
    pub fn handle_disconnect(&self, session_id: &str, room_id: &str) {
        let Some(identity) = self.state.sessions.remove(session_id) else {
            debug!(session = %session_id, room = %room_id, "disconnect for unknown session");
            return;
        };

        let room = match self.state.rooms.room_of(session_id) {
            Some(known) => {
                if known != room_id {
                    warn!(session = %session_id, given = %room_id, known = %known, "disconnect room mismatch");
                }
                known
            }
            None => room_id.to_string(),
        };
        self.state.rooms.remove_member(&room, session_id);

        info!(session = %session_id, room = %room, username = %identity.username, "left");
        self.egress.send_to_room(
            &room,
            &ServerMessage::Disconnected {
                socket_id: session_id.to_string(),
                username: identity.username,
                room_id: room.clone(),
            },
        );
    }

    /// Materialize the room roster, skipping ids no longer registered.
    pub fn roster(&self, room_id: &str) -> Vec<Member> {
        self.state
            .rooms
            .members_of(room_id)
            .into_iter()
            .filter_map(|sid| {
                self.state
                    .sessions
                    .lookup(&sid)
                    .map(|identity| identity.to_member(&sid))
            })
            .collect()
    }
}
