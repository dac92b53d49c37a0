//! Realtime relay for the codecollab gateway.
//!
//! Registry and room index, the relay controller, the egress seam the
//! transport implements, and the disconnect listener.

pub mod core;
pub mod listener;
pub mod types;

pub use self::core::{RelayController, RelayState, RelayStats, RoomIndex, SessionRegistry};
pub use listener::{ConnectionClosed, DisconnectHandler, DisconnectListener};
pub use types::Egress;
