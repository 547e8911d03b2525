//! Mailmatch Core - session and account-linking logic
//!
//! This crate implements the core client logic following hexagonal
//! architecture:
//!
//! - **domain**: Core entities (SessionId, AccountId, Provider)
//! - **ports**: Trait definitions for external dependencies (BackendApi,
//!   SessionStorage, window and completion-message channels)
//! - **services**: Session lifecycle, account registry, login flow, and the
//!   synchronization coordinator
//! - **adapters**: Concrete implementations (reqwest backend, session file,
//!   system browser + loopback relay)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::browser::{LoopbackRelay, SystemWindowOpener};
use adapters::file_store::FileSessionStorage;
use adapters::http::HttpBackend;
use config::Config;
use services::{
    AccountCoordinator, EventLogService, LoginFlow, ProcessService, RegistryService,
    SessionService,
};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{AccountId, Provider, SessionId};
pub use ports::{CompletionMessage, ProcessOutcome};
pub use services::{AttemptState, EventKind, LoginOutcome, Snapshot};

/// Main context for mailmatch operations
///
/// The primary entry point: owns the configuration, the session handle, and
/// all services, wired against the real adapters.
pub struct MailmatchContext {
    pub config: Config,
    pub session: Arc<SessionService>,
    pub registry: Arc<RegistryService>,
    pub coordinator: AccountCoordinator,
    pub process_service: ProcessService,
    pub event_log: EventLogService,
}

impl MailmatchContext {
    /// Create a new mailmatch context rooted at the given data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let backend = Arc::new(HttpBackend::new(&config.api_url)?);
        let storage = Arc::new(FileSessionStorage::new(data_dir));

        let session = Arc::new(SessionService::new(storage, backend.clone()));
        let registry = Arc::new(RegistryService::new(session.clone(), backend));
        let login = Arc::new(LoginFlow::new(
            registry.clone(),
            Arc::new(SystemWindowOpener::new()),
            Arc::new(LoopbackRelay::new()),
        ));
        let coordinator = AccountCoordinator::new(registry.clone(), login);
        let process_service = ProcessService::new(registry.clone());
        let event_log = EventLogService::new(data_dir, env!("CARGO_PKG_VERSION"));

        Ok(Self {
            config,
            session,
            registry,
            coordinator,
            process_service,
            event_log,
        })
    }
}
