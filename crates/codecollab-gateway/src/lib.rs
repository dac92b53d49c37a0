//! codecollab gateway library entry.
//!
//! This crate wires the WebSocket transport, dispatcher, and relay core into
//! a collaborative-editing relay. It is consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod realtime;
pub mod router;
pub mod transport;
