//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler, the origin guard applied before upgrade,
//! the codec that decodes frames once, and the connection hub that supplies
//! room broadcast and session unicast to the relay.

pub mod codec;
pub mod handshake;
pub mod hub;
pub mod ws;

pub use hub::{ConnId, ConnectionHub};
