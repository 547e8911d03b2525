//! Result and error types for the core library
//!
//! Every failure a service can surface maps to one of these variants; raw
//! transport errors are converted at the adapter boundary and never cross
//! into callers unlabelled. The variants mirror the user-facing taxonomy:
//! session establishment, popup blocking, and disconnect failures abort the
//! operation loudly, while account listing degrades to an empty list at the
//! service layer and never raises.

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot establish session: {0}")]
    Session(String),

    #[error("Popup blocked: {0}")]
    PopupBlocked(String),

    #[error("Could not get authorization URL: {0}")]
    AuthorizationUrl(String),

    #[error("Failed to disconnect account: HTTP {status}")]
    Disconnect { status: u16 },

    #[error("Processing failed: {0}")]
    Process(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a session-establishment error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnect_error_carries_status() {
        let err = Error::Disconnect { status: 404 };
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_session_error_message() {
        let err = Error::session("backend unreachable");
        assert!(err.to_string().starts_with("Cannot establish session"));
    }
}
