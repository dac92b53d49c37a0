//! Decode-once codec for the transport layer.
//!
//! - Text frames => `ClientFrame` (size-checked before parsing)
//! - Binary frames are not part of the protocol and are rejected
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use codecollab_core::{
    error::{CodeCollabError, Result},
    protocol::{decode_client_frame, ClientFrame, ServerMessage},
};

#[derive(Debug)]
pub enum Inbound {
    Frame(ClientFrame),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

/// Cheap frame length, computed before any parsing.
pub fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(s) => s.len(),
        Message::Binary(b) => b.len(),
        Message::Ping(v) => v.len(),
        Message::Pong(v) => v.len(),
        Message::Close(_) => 0,
    }
}

pub fn decode(msg: Message, max_frame_bytes: usize) -> Result<Inbound> {
    let len = frame_len(&msg);
    if len > max_frame_bytes {
        return Err(CodeCollabError::PayloadTooLarge {
            len,
            max: max_frame_bytes,
        });
    }

    match msg {
        Message::Text(s) => Ok(Inbound::Frame(decode_client_frame(&s)?)),
        Message::Binary(_) => Err(CodeCollabError::BadRequest(
            "binary frames are not supported".into(),
        )),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(v) => Ok(Inbound::Pong(v)),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

/// Encode a server message as a WS text frame.
pub fn encode(msg: &ServerMessage) -> Result<Message> {
    Ok(Message::Text(msg.to_json()?))
}
