//! Client display identity and its roster projection.

use serde::{Deserialize, Serialize};

use crate::protocol::SessionId;

/// Username used when a join request carries none.
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// Display identity bound to one live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub username: String,
    pub email: String,
    pub avatar_ref: String,
}

impl ClientIdentity {
    /// Build an identity from optional join fields, substituting defaults.
    ///
    /// Missing fields are never an error: the username falls back to
    /// [`DEFAULT_USERNAME`], everything else to an empty string.
    pub fn from_parts(
        username: Option<String>,
        email: Option<String>,
        avatar_ref: Option<String>,
    ) -> Self {
        Self {
            username: username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            email: email.unwrap_or_default(),
            avatar_ref: avatar_ref.unwrap_or_default(),
        }
    }

    /// Project this identity into a roster entry for `session_id`.
    pub fn to_member(&self, session_id: &str) -> Member {
        Member {
            socket_id: session_id.to_string(),
            username: self.username.clone(),
            email: self.email.clone(),
            photo_url: self.avatar_ref.clone(),
        }
    }
}

/// One entry of a room roster as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "socketId")]
    pub socket_id: SessionId,
    pub username: String,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}
