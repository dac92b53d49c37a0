//! Wire protocol for the collaboration relay.
//!
//! Both directions are JSON text frames discriminated by a `type` field:
//! - Client frames (`join`, `code-change`, `sync-code`, `leave`) are decoded
//!   once by the transport and handed to the relay as typed requests.
//! - Server messages (`JOINED`, `CODE_CHANGE`, `DISCONNECTED`, `ERROR`) are
//!   built by the relay and serialized once per broadcast.
//!
//! Field names follow the editor client (`roomId`, `socketId`, `photoURL`).

pub mod client;
pub mod identity;
pub mod server;

pub use client::{decode_client_frame, ClientFrame, CodeChange, Join, Leave, SyncCode};
pub use identity::{ClientIdentity, Member, DEFAULT_USERNAME};
pub use server::ServerMessage;

/// Opaque relay-issued session identifier.
pub type SessionId = String;

/// Room identifier chosen by clients.
pub type RoomId = String;
