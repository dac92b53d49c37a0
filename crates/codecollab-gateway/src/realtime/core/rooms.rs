use dashmap::{DashMap, DashSet};

use codecollab_core::protocol::{RoomId, SessionId};

/// Room membership: room_id -> sessions, session_id -> room.
///
/// A room key exists only while it has at least one member. Membership does
/// not check liveness against the session registry; callers materializing a
/// roster skip ids whose identity is gone.
#[derive(Default)]
pub struct RoomIndex {
    room_to_sessions: DashMap<RoomId, DashSet<SessionId>>,
    session_to_room: DashMap<SessionId, RoomId>,
}

impl RoomIndex {
    pub fn new() -> Self {
        Self {
            room_to_sessions: DashMap::new(),
            session_to_room: DashMap::new(),
        }
    }

    /// Add `session_id` to `room_id`, creating the room if absent.
    pub fn add_member(&self, room_id: &str, session_id: &str) {
        // insert while holding the shard entry so a concurrent
        // `remove_member` cannot drop the room between lookup and insert
        self.room_to_sessions
            .entry(room_id.to_string())
            .or_insert_with(DashSet::new)
            .insert(session_id.to_string());

        self.session_to_room
            .insert(session_id.to_string(), room_id.to_string());
    }

    /// Remove `session_id` from `room_id`, deleting the room once empty.
    ///
    /// Returns whether the session was a member.
    pub fn remove_member(&self, room_id: &str, session_id: &str) -> bool {
        let removed = match self.room_to_sessions.get(room_id) {
            Some(set) => set.remove(session_id).is_some(),
            None => false,
        };
        self.room_to_sessions.remove_if(room_id, |_, set| set.is_empty());
        self.session_to_room
            .remove_if(session_id, |_, room| room.as_str() == room_id);
        removed
    }

    /// Snapshot of the members of `room_id`; empty for unknown rooms.
    pub fn members_of(&self, room_id: &str) -> Vec<SessionId> {
        self.room_to_sessions
            .get(room_id)
            .map(|set| set.iter().map(|s| s.key().to_string()).collect())
            .unwrap_or_default()
    }

    /// Room the session last joined, if it is still a member somewhere.
    pub fn room_of(&self, session_id: &str) -> Option<RoomId> {
        self.session_to_room
            .get(session_id)
            .map(|r| r.value().clone())
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.room_to_sessions.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.room_to_sessions.len()
    }

    pub fn clear(&self) {
        self.room_to_sessions.clear();
        self.session_to_room.clear();
    }
}
