//! Connection hub: the transport side of room broadcast and unicast.
//!
//! Tracks every open socket's outbound queue, which room topic it listens
//! on, and which relay session it carries. Implements [`Egress`] by
//! serializing each message once and `try_send`ing it to every recipient;
//! a full or closed queue drops the message and bumps a counter.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use dashmap::{DashMap, DashSet};
use tokio::sync::mpsc;
use tracing::{trace, warn};

use codecollab_core::protocol::{RoomId, ServerMessage, SessionId};

use crate::realtime::Egress;
use crate::transport::codec;

/// Transport-local connection id.
pub type ConnId = u64;

/// One socket's outbound queue sender.
#[derive(Clone)]
pub struct Connection {
    pub tx: mpsc::Sender<Message>,
}

#[derive(Default)]
pub struct ConnectionHub {
    conns: DashMap<ConnId, Connection>,
    topics: DashMap<RoomId, DashSet<ConnId>>,
    conn_topic: DashMap<ConnId, RoomId>,
    bound: DashMap<SessionId, ConnId>,
    seq: AtomicU64,
    dropped: AtomicU64,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
            topics: DashMap::new(),
            conn_topic: DashMap::new(),
            bound: DashMap::new(),
            seq: AtomicU64::new(1),
            dropped: AtomicU64::new(0),
        }
    }

    /// Register a socket's outbound queue and hand back its id.
    pub fn register(&self, tx: mpsc::Sender<Message>) -> ConnId {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        self.conns.insert(id, Connection { tx });
        id
    }

    /// Subscribe `conn` to `room_id`'s topic, replacing any previous topic.
    pub fn subscribe(&self, conn: ConnId, room_id: &str) {
        if let Some(prev) = self.conn_topic.insert(conn, room_id.to_string()) {
            if prev != room_id {
                self.drop_from_topic(&prev, conn);
            }
        }
        self.topics
            .entry(room_id.to_string())
            .or_insert_with(DashSet::new)
            .insert(conn);
    }

    pub fn unsubscribe(&self, conn: ConnId, room_id: &str) {
        self.conn_topic
            .remove_if(&conn, |_, room| room.as_str() == room_id);
        self.drop_from_topic(room_id, conn);
    }

    /// Route unicasts for `session_id` to `conn`.
    pub fn bind_session(&self, session_id: &str, conn: ConnId) {
        self.bound.insert(session_id.to_string(), conn);
    }

    pub fn unbind_session(&self, session_id: &str) {
        self.bound.remove(session_id);
    }

    /// Forget a closed socket along with its topic and session binding.
    pub fn remove_connection(&self, conn: ConnId, session_id: Option<&str>) {
        if let Some((_, room)) = self.conn_topic.remove(&conn) {
            self.drop_from_topic(&room, conn);
        }
        if let Some(sid) = session_id {
            self.bound.remove_if(sid, |_, c| *c == conn);
        }
        self.conns.remove(&conn);
    }

    pub fn subscribers(&self, room_id: &str) -> Vec<ConnId> {
        self.topics
            .get(room_id)
            .map(|set| set.iter().map(|c| *c.key()).collect())
            .unwrap_or_default()
    }

    pub fn connection_count(&self) -> usize {
        self.conns.len()
    }

    /// Messages dropped because a recipient queue was full or closed.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn drop_from_topic(&self, room_id: &str, conn: ConnId) {
        if let Some(set) = self.topics.get(room_id) {
            set.remove(&conn);
        }
        self.topics.remove_if(room_id, |_, set| set.is_empty());
    }

    /// Queue a prepared frame for one connection, counting it as dropped
    /// when the queue is full or closed.
    pub fn deliver(&self, conn: ConnId, msg: Message) {
        let Some(c) = self.conns.get(&conn).map(|r| r.value().clone()) else {
            return;
        };
        if c.tx.try_send(msg).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            warn!(conn, "outbound queue full or closed; message dropped");
        }
    }
}

impl Egress for ConnectionHub {
    fn send_to_room(&self, room_id: &str, msg: &ServerMessage) {
        let prepared = match codec::encode(msg) {
            Ok(m) => m,
            Err(e) => {
                warn!(room = %room_id, kind = msg.kind(), error = %e, "encode failed");
                return;
            }
        };
        let recipients = self.subscribers(room_id);
        trace!(room = %room_id, kind = msg.kind(), recipients = recipients.len(), "broadcast");
        for conn in recipients {
            self.deliver(conn, prepared.clone());
        }
    }

    fn send_to_session(&self, session_id: &str, msg: &ServerMessage) {
        let Some(conn) = self.bound.get(session_id).map(|r| *r.value()) else {
            trace!(session = %session_id, kind = msg.kind(), "unicast to unbound session");
            return;
        };
        match codec::encode(msg) {
            Ok(m) => self.deliver(conn, m),
            Err(e) => warn!(session = %session_id, kind = msg.kind(), error = %e, "encode failed"),
        }
    }
}
