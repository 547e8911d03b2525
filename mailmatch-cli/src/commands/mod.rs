//! CLI command implementations

pub mod accounts;
pub mod disconnect;
pub mod login;
pub mod logout;
pub mod logs;
pub mod process;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use mailmatch_core::{EventKind, MailmatchContext};

/// Get the mailmatch directory from environment or default
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MAILMATCH_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".mailmatch")
    }
}

/// Get or create mailmatch context
pub fn get_context() -> Result<MailmatchContext> {
    let data_dir = get_data_dir();

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create mailmatch directory: {:?}", data_dir))?;

    MailmatchContext::new(&data_dir).context("Failed to initialize mailmatch context")
}

/// Log an event, ignoring any errors (logging should never break a command)
pub fn log_event(ctx: &MailmatchContext, kind: EventKind, success: bool, detail: Option<&str>) {
    let _ = ctx.event_log.log(kind, success, detail);
}
