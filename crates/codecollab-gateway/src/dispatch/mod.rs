//! Dispatcher module exports.
//!
//! Maps decoded client frames onto relay calls for one connection.

pub mod dispatcher;

pub use dispatcher::Dispatcher;
