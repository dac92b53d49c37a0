//! Shared error type across codecollab crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed frame.
    BadRequest,
    /// Frame not valid in the connection's current phase.
    InvalidState,
    /// Frame exceeds the configured size limit.
    PayloadTooLarge,
    /// Unsupported config or protocol version.
    UnsupportedVersion,
    /// Connection closed after inactivity.
    Timeout,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidState => "INVALID_STATE",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CodeCollabError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum CodeCollabError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("payload too large: {len} > {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),
    #[error("idle timeout")]
    Timeout,
    #[error("internal: {0}")]
    Internal(String),
}

impl CodeCollabError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            CodeCollabError::BadRequest(_) => ClientCode::BadRequest,
            CodeCollabError::InvalidState(_) => ClientCode::InvalidState,
            CodeCollabError::PayloadTooLarge { .. } => ClientCode::PayloadTooLarge,
            CodeCollabError::UnsupportedVersion(_) => ClientCode::UnsupportedVersion,
            CodeCollabError::Timeout => ClientCode::Timeout,
            CodeCollabError::Internal(_) => ClientCode::Internal,
        }
    }
}
