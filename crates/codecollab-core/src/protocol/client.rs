//! Client -> relay frames.

use serde::Deserialize;

use crate::error::{CodeCollabError, Result};
use crate::protocol::{ClientIdentity, RoomId, SessionId};

/// Inbound frame, discriminated by `type`.
///
/// Unknown fields are ignored so older and newer editor builds can share a
/// relay; an unknown `type` is a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    Join(Join),
    CodeChange(CodeChange),
    SyncCode(SyncCode),
    Leave(Leave),
}

impl ClientFrame {
    /// Wire name of the frame type, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientFrame::Join(_) => "join",
            ClientFrame::CodeChange(_) => "code-change",
            ClientFrame::SyncCode(_) => "sync-code",
            ClientFrame::Leave(_) => "leave",
        }
    }
}

/// `join`: enter a room with an optional display identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Join {
    pub room_id: RoomId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

impl Join {
    /// Identity carried by this join, with defaults for absent fields.
    pub fn identity(&self) -> ClientIdentity {
        ClientIdentity::from_parts(
            self.username.clone(),
            self.email.clone(),
            self.photo_url.clone(),
        )
    }
}

/// `code-change`: relay an editor buffer to the whole room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChange {
    pub room_id: RoomId,
    #[serde(default)]
    pub code: String,
}

/// `sync-code`: hand the current buffer to a single late joiner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCode {
    pub socket_id: SessionId,
    pub room_id: RoomId,
    #[serde(default)]
    pub code: String,
}

/// `leave`: explicit departure from a room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub socket_id: SessionId,
    pub room_id: RoomId,
}

/// Decode one text frame into a [`ClientFrame`].
pub fn decode_client_frame(s: &str) -> Result<ClientFrame> {
    let frame: ClientFrame = serde_json::from_str(s)
        .map_err(|e| CodeCollabError::BadRequest(format!("invalid frame json: {e}")))?;

    let room = match &frame {
        ClientFrame::Join(j) => &j.room_id,
        ClientFrame::CodeChange(c) => &c.room_id,
        ClientFrame::SyncCode(s) => &s.room_id,
        ClientFrame::Leave(l) => &l.room_id,
    };
    if room.is_empty() {
        return Err(CodeCollabError::BadRequest(format!(
            "{} requires a non-empty roomId",
            frame.kind()
        )));
    }
    Ok(frame)
}
