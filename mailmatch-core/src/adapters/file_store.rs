//! File-backed session storage
//!
//! The session id lives in a single file under the data directory, under a
//! fixed name, surviving restarts. Reads always go back to the file so a
//! clear performed by another command against the same directory is
//! observed immediately.

use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::domain::SessionId;
use crate::ports::SessionStorage;

const SESSION_FILE: &str = "session_id";

/// Session storage in the data directory
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<SessionId>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SessionId::new(trimmed)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::storage(format!(
                "Failed to read session file: {}",
                e
            ))),
        }
    }

    fn store(&self, id: &SessionId) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, id.as_str())
            .map_err(|e| Error::storage(format!("Failed to write session file: {}", e)))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(format!(
                "Failed to clear session file: {}",
                e
            ))),
        }
    }
}
