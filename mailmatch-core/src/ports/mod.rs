//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core services
//! depend only on these traits, not on concrete implementations.

mod backend;
mod browser;
mod storage;

pub use backend::{BackendApi, CsvUpload, ProcessOutcome};
pub use browser::{
    AuthorizationWindow, CompletionListener, CompletionMessage, CompletionSubscriber, WindowOpener,
};
pub use storage::SessionStorage;
