use std::sync::Arc;

use tracing::debug;

use codecollab_core::error::{CodeCollabError, Result};
use codecollab_core::protocol::{ClientFrame, Leave};

use crate::context::ConnectionContext;
use crate::realtime::RelayController;
use crate::transport::ConnectionHub;

/// Routes decoded client frames to the relay, keeping the connection's
/// phase and hub subscriptions in step.
///
/// Returns an error only for frames invalid in the connection's phase; the
/// relay itself never fails.
pub struct Dispatcher {
    relay: Arc<RelayController>,
    hub: Arc<ConnectionHub>,
}

impl Dispatcher {
    pub fn new(relay: Arc<RelayController>, hub: Arc<ConnectionHub>) -> Self {
        Self { relay, hub }
    }

    pub fn dispatch(&self, ctx: &mut ConnectionContext, frame: ClientFrame) -> Result<()> {
        debug!(conn = ctx.conn_id(), kind = frame.kind(), "dispatch");
        match frame {
            ClientFrame::Join(req) => {
                ctx.ensure_unjoined()?;
                // subscribe first so the joiner receives its own JOINED
                self.hub.subscribe(ctx.conn_id(), &req.room_id);
                let session_id = self.relay.handle_join(&req);
                self.hub.bind_session(&session_id, ctx.conn_id());
                ctx.mark_joined(session_id, req.room_id);
            }
            ClientFrame::CodeChange(req) => {
                let (_, room_id) = ctx.joined()?;
                ensure_own_room(room_id, &req.room_id)?;
                self.relay.handle_code_change(&req);
            }
            ClientFrame::SyncCode(req) => {
                let (_, room_id) = ctx.joined()?;
                ensure_own_room(room_id, &req.room_id)?;
                let target_room = self.relay.state().rooms.room_of(&req.socket_id);
                if target_room.as_deref() != Some(room_id) {
                    return Err(CodeCollabError::InvalidState(
                        "sync-code target is not in this connection's room",
                    ));
                }
                self.relay.handle_sync_code(&req);
            }
            ClientFrame::Leave(req) => self.leave(ctx, req)?,
        }
        Ok(())
    }

    fn leave(&self, ctx: &mut ConnectionContext, req: Leave) -> Result<()> {
        let (session_id, room_id) = ctx.joined()?;
        if req.socket_id != session_id {
            return Err(CodeCollabError::InvalidState(
                "leave must name this connection's session",
            ));
        }
        ensure_own_room(room_id, &req.room_id)?;
        let room_id = room_id.to_string();

        // broadcast DISCONNECTED while still subscribed, then drop the topic
        self.relay.handle_leave(&req);
        self.hub.unsubscribe(ctx.conn_id(), &room_id);
        self.hub.unbind_session(&req.socket_id);
        ctx.mark_left();
        Ok(())
    }
}

fn ensure_own_room(joined: &str, requested: &str) -> Result<()> {
    if joined != requested {
        return Err(CodeCollabError::InvalidState(
            "frame addressed to a room this connection has not joined",
        ));
    }
    Ok(())
}
