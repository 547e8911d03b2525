//! Session service - owns the opaque session token
//!
//! Acquisition rule is validate-then-reissue: a stored id is probed against
//! the backend before use, and discarded in favour of a fresh one when the
//! probe fails. The in-memory copy is a mirror of durable storage, refreshed
//! on every access, so a clear performed elsewhere in the process is picked
//! up rather than clobbered.

use std::sync::{Arc, Mutex};

use crate::domain::result::{Error, Result};
use crate::domain::SessionId;
use crate::ports::{BackendApi, SessionStorage};

/// Session service
pub struct SessionService {
    storage: Arc<dyn SessionStorage>,
    backend: Arc<dyn BackendApi>,
    current: Mutex<Option<SessionId>>,
}

impl SessionService {
    pub fn new(storage: Arc<dyn SessionStorage>, backend: Arc<dyn BackendApi>) -> Self {
        Self {
            storage,
            backend,
            current: Mutex::new(None),
        }
    }

    /// Return a usable session id, issuing a new one if needed
    ///
    /// Idempotent: while the stored id stays valid, repeated calls make one
    /// validation probe each and zero issuance calls, and return the same id.
    /// Issuance failure is fatal to the calling operation and surfaces as
    /// [`Error::Session`].
    pub async fn ensure_session(&self) -> Result<SessionId> {
        let stored = self.storage.load()?;
        self.set_current(stored.clone());

        if let Some(id) = stored {
            if self.validate(&id).await {
                return Ok(id);
            }
            // Stored id failed validation: discard and reissue transparently
            self.storage.clear()?;
            self.set_current(None);
        }

        let id = self
            .backend
            .issue_session()
            .await
            .map_err(|e| Error::session(e.to_string()))?;
        self.storage.store(&id)?;
        self.set_current(Some(id.clone()));
        Ok(id)
    }

    /// Discard the persisted id and the in-memory mirror. No-op if none.
    pub fn clear_session(&self) -> Result<()> {
        self.storage.clear()?;
        self.set_current(None);
        Ok(())
    }

    /// Pure local check of durable storage - UI gating only, never a
    /// substitute for `ensure_session`
    pub fn has_session(&self) -> bool {
        matches!(self.storage.load(), Ok(Some(_)))
    }

    /// Last session id observed by this service, if any
    pub fn current(&self) -> Option<SessionId> {
        self.current.lock().unwrap().clone()
    }

    /// A session is valid when an authenticated account listing succeeds
    /// with a well-formed collection
    async fn validate(&self, id: &SessionId) -> bool {
        self.backend.list_accounts(id).await.is_ok()
    }

    fn set_current(&self, value: Option<SessionId>) {
        *self.current.lock().unwrap() = value;
    }
}
