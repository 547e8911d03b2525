//! Account registry service - fetch, unlink, and authorize linked accounts
//!
//! Reads are best-effort: a failed listing degrades to an empty collection
//! so the caller renders "no accounts" instead of an error. Writes are
//! correctness-critical and fail loudly with the backend status.

use std::sync::Arc;

use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountId, Provider};
use crate::ports::{BackendApi, CsvUpload, ProcessOutcome};
use crate::services::SessionService;

/// Account registry client
pub struct RegistryService {
    session: Arc<SessionService>,
    backend: Arc<dyn BackendApi>,
}

impl RegistryService {
    pub fn new(session: Arc<SessionService>, backend: Arc<dyn BackendApi>) -> Self {
        Self { session, backend }
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    /// List linked accounts, in backend order
    ///
    /// Degrades to an empty list on any failure, including a session that
    /// cannot be established.
    pub async fn list_accounts(&self) -> Vec<AccountId> {
        let session = match self.session.ensure_session().await {
            Ok(id) => id,
            Err(_) => return Vec::new(),
        };
        self.backend
            .list_accounts(&session)
            .await
            .unwrap_or_default()
    }

    /// Unlink one account and return the authoritative post-disconnect list
    ///
    /// Removal failure aborts loudly with the backend status. When the last
    /// account goes away the session is cleared too: no accounts, no reason
    /// to keep a session alive.
    pub async fn disconnect(&self, account: &AccountId) -> Result<Vec<AccountId>> {
        let session = self.session.ensure_session().await?;
        self.backend.disconnect(&session, account).await?;

        let remaining = self.list_accounts().await;
        if remaining.is_empty() {
            self.session.clear_session()?;
        }
        Ok(remaining)
    }

    /// Ask the backend for a provider authorization URL tied to the session
    pub async fn authorization_url(
        &self,
        provider: Provider,
        relay_port: Option<u16>,
    ) -> Result<Url> {
        let session = self.session.ensure_session().await?;
        self.backend
            .authorization_url(&session, provider, relay_port)
            .await
            .map_err(|e| match e {
                Error::Session(_) => e,
                other => Error::AuthorizationUrl(other.to_string()),
            })
    }

    /// Upload a transaction file for reconciliation against the given
    /// accounts
    pub async fn process(&self, upload: CsvUpload) -> Result<ProcessOutcome> {
        let session = self.session.ensure_session().await?;
        self.backend.process(&session, upload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MemoryStorage, MockBackend};
    use crate::domain::SessionId;

    fn registry(backend: Arc<MockBackend>) -> RegistryService {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(SessionService::new(storage, backend.clone()));
        RegistryService::new(session, backend)
    }

    #[tokio::test]
    async fn test_listing_degrades_to_empty_on_failure() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_issuance();
        let reg = registry(backend);
        assert!(reg.list_accounts().await.is_empty());
    }

    #[tokio::test]
    async fn test_listing_returns_backend_order() {
        let backend = Arc::new(MockBackend::new());
        backend.set_accounts(&["b@x.com (gmail)", "a@x.com (gmail)"]);
        let reg = registry(backend);
        let list = reg.list_accounts().await;
        assert_eq!(
            list,
            vec![
                AccountId::from("b@x.com (gmail)"),
                AccountId::from("a@x.com (gmail)")
            ]
        );
    }

    #[tokio::test]
    async fn test_disconnect_failure_is_loud_with_status() {
        let backend = Arc::new(MockBackend::new());
        backend.set_accounts(&["a@x.com (gmail)"]);
        backend.fail_disconnect(409);
        let reg = registry(backend);
        let err = reg
            .disconnect(&AccountId::from("a@x.com (gmail)"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Disconnect { status: 409 }));
    }

    #[tokio::test]
    async fn test_disconnecting_last_account_clears_session() {
        let backend = Arc::new(MockBackend::new());
        backend.set_accounts(&["only@x.com (gmail)"]);
        let reg = registry(backend);

        // Establish a session first
        reg.session().ensure_session().await.unwrap();
        assert!(reg.session().has_session());

        let remaining = reg
            .disconnect(&AccountId::from("only@x.com (gmail)"))
            .await
            .unwrap();
        assert!(remaining.is_empty());
        assert!(!reg.session().has_session());
    }

    #[tokio::test]
    async fn test_disconnect_keeps_session_while_accounts_remain() {
        let backend = Arc::new(MockBackend::new());
        backend.set_accounts(&["a@x.com (gmail)", "b@x.com (outlook)"]);
        let reg = registry(backend);

        let remaining = reg
            .disconnect(&AccountId::from("a@x.com (gmail)"))
            .await
            .unwrap();
        assert_eq!(remaining, vec![AccountId::from("b@x.com (outlook)")]);
        assert!(reg.session().has_session());
    }

    #[tokio::test]
    async fn test_authorization_url_failure_is_distinct() {
        let backend = Arc::new(MockBackend::new());
        backend.fail_auth_url();
        let reg = registry(backend);
        let err = reg
            .authorization_url(Provider::Gmail, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthorizationUrl(_)));
    }

    #[tokio::test]
    async fn test_authorization_url_forwards_relay_port() {
        let backend = Arc::new(MockBackend::new());
        let reg = registry(backend.clone());
        reg.authorization_url(Provider::Outlook, Some(49152))
            .await
            .unwrap();
        assert_eq!(backend.relay_ports(), vec![Some(49152)]);
    }

    #[tokio::test]
    async fn test_every_call_ensures_a_session_first() {
        let backend = Arc::new(MockBackend::new());
        backend.queue_session("s1");
        let reg = registry(backend.clone());
        reg.list_accounts().await;
        assert_eq!(backend.issue_calls(), 1);
        assert_eq!(
            reg.session().current(),
            Some(SessionId::new("s1")),
            "registry call should have established the session"
        );
    }
}
