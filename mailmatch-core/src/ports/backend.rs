//! Backend API port
//!
//! The HTTP surface the core consumes. Implementations translate transport
//! failures into the domain error taxonomy; callers decide which failures
//! abort an operation and which degrade.

use async_trait::async_trait;
use url::Url;

use crate::domain::result::Result;
use crate::domain::{AccountId, Provider, SessionId};

/// A transaction file queued for reconciliation
#[derive(Debug, Clone)]
pub struct CsvUpload {
    pub filename: String,
    pub content: Vec<u8>,
    /// Accounts the backend should scan for receipts
    pub accounts: Vec<AccountId>,
}

/// Decoded result of a reconciliation run
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub digest_csv: Vec<u8>,
    pub exceptions_csv: Vec<u8>,
    pub digest_filename: String,
    pub exceptions_filename: String,
}

/// Backend API trait
///
/// One method per backend call. `list_accounts` doubles as the session
/// validation probe: a well-formed account collection under a session header
/// is what "valid session" means.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `POST /session` - issue a fresh session token
    async fn issue_session(&self) -> Result<SessionId>;

    /// `GET /accounts` - list accounts linked to the session
    ///
    /// Non-success or a malformed body is an error here; the registry
    /// service decides whether that degrades to an empty list.
    async fn list_accounts(&self, session: &SessionId) -> Result<Vec<AccountId>>;

    /// `GET /login/{provider}` - obtain a provider authorization URL
    ///
    /// `relay_port`, when present, tells the backend where the completion
    /// hop should deliver the `{provider, email}` message on this machine.
    async fn authorization_url(
        &self,
        session: &SessionId,
        provider: Provider,
        relay_port: Option<u16>,
    ) -> Result<Url>;

    /// `DELETE /accounts?account=<address>` - unlink one account
    async fn disconnect(&self, session: &SessionId, account: &AccountId) -> Result<()>;

    /// `POST /process` - upload a transaction file for reconciliation
    async fn process(&self, session: &SessionId, upload: CsvUpload) -> Result<ProcessOutcome>;
}
