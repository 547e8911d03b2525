//! Process service - submit a transaction file for reconciliation
//!
//! Thin orchestration over the backend's `/process` call: the matching
//! itself is entirely server-side. The client-side guard mirrors the
//! backend's own rule that at least one account must be selected.

use std::path::Path;
use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::AccountId;
use crate::ports::{CsvUpload, ProcessOutcome};
use crate::services::RegistryService;

/// A reconciliation request
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub filename: String,
    pub content: Vec<u8>,
    pub accounts: Vec<AccountId>,
}

impl ProcessRequest {
    /// Build a request from a file on disk and the selected accounts
    pub fn from_file(path: &Path, accounts: Vec<AccountId>) -> Result<Self> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "transactions.csv".to_string());
        let content = std::fs::read(path)?;
        Ok(Self {
            filename,
            content,
            accounts,
        })
    }
}

/// Process service
pub struct ProcessService {
    registry: Arc<RegistryService>,
}

impl ProcessService {
    pub fn new(registry: Arc<RegistryService>) -> Self {
        Self { registry }
    }

    /// Upload the file and return the decoded digest/exceptions reports
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessOutcome> {
        if request.accounts.is_empty() {
            return Err(Error::Process("No accounts selected".to_string()));
        }
        if request.content.is_empty() {
            return Err(Error::Process(format!(
                "{} is empty",
                request.filename
            )));
        }
        self.registry
            .process(CsvUpload {
                filename: request.filename,
                content: request.content,
                accounts: request.accounts,
            })
            .await
    }
}
