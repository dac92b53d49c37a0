use codecollab_core::protocol::ServerMessage;

/// Outbound delivery primitives supplied by the transport layer.
///
/// Both calls are fire-and-forget: delivery failures are the transport's to
/// log or count, never surfaced back into the relay.
pub trait Egress: Send + Sync {
    /// Deliver `msg` to every connection subscribed to `room_id`.
    fn send_to_room(&self, room_id: &str, msg: &ServerMessage);

    /// Deliver `msg` to the one connection bound to `session_id`.
    fn send_to_session(&self, session_id: &str, msg: &ServerMessage);
}
