//! Relay core components for the gateway runtime.
//!
//! Session registry, room membership index, and the relay controller that
//! drives them.

mod relay;
mod rooms;
mod session_registry;

pub use relay::{RelayController, RelayState, RelayStats};
pub use rooms::RoomIndex;
pub use session_registry::SessionRegistry;
