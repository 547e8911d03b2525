//! Session identity
//!
//! A session is an opaque server-issued token. The client never inspects it;
//! it only stores it durably and sends it back in the `X-Session-ID` header.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque server-issued session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
