//! Service layer - orchestration of session, linking, and reconciliation

mod coordinator;
mod login;
mod logging;
mod process;
mod registry;
mod session;

pub use coordinator::{AccountCoordinator, Snapshot};
pub use login::{AttemptState, LoginFlow, LoginOutcome};
pub use logging::{EventKind, EventLogService, LogEvent};
pub use process::{ProcessRequest, ProcessService};
pub use registry::RegistryService;
pub use session::SessionService;
