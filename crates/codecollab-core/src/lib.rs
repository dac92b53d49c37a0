//! codecollab core: transport-agnostic wire types and the shared error type.
//!
//! This crate defines the frames exchanged between editor clients and the
//! relay gateway, plus the error surface shared by the gateway and its
//! transport. It intentionally carries no transport or runtime dependencies so
//! the relay can be driven from tests or alternative transports.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed client input must surface as `CodeCollabError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ClientCode, CodeCollabError, Result};
