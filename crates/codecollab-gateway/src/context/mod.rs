//! Per-connection context shared between transport and dispatcher.

pub mod connection;

pub use connection::{ConnectionContext, Phase};
