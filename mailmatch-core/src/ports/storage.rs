//! Durable session storage port
//!
//! One string under a fixed key, surviving restarts. Reads go back to the
//! durable store every time so an out-of-band clear (another command in the
//! same directory) is always observed.

use crate::domain::result::Result;
use crate::domain::SessionId;

/// Session storage trait
pub trait SessionStorage: Send + Sync {
    /// Read the stored session id, if any
    fn load(&self) -> Result<Option<SessionId>>;

    /// Persist the session id, replacing any previous one
    fn store(&self, id: &SessionId) -> Result<()>;

    /// Discard the stored session id. No-op if none exists.
    fn clear(&self) -> Result<()>;
}
