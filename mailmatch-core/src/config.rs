//! Configuration management
//!
//! Settings live in `settings.json` under the data directory:
//! ```json
//! {
//!   "apiUrl": "http://127.0.0.1:8000",
//!   "defaultProvider": "gmail"
//! }
//! ```
//! The `MAILMATCH_API_URL` environment variable overrides the backend URL,
//! for tests and staging setups.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::adapters::http;
use crate::domain::Provider;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    default_provider: Option<Provider>,
    // Preserve fields this CLI does not manage
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Mailmatch configuration (resolved view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub default_provider: Provider,
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: http::get_base_url(),
            default_provider: Provider::Gmail,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Resolution order for the backend URL: `MAILMATCH_API_URL`, then
    /// settings.json, then the built-in default.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let api_url = std::env::var(http::BASE_URL_ENV)
            .ok()
            .or_else(|| raw.api_url.clone())
            .unwrap_or_else(http::get_base_url);

        Ok(Self {
            api_url,
            default_provider: raw.default_provider.unwrap_or(Provider::Gmail),
            _raw_settings: raw,
        })
    }

    /// Save config, preserving settings the CLI doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.api_url = Some(self.api_url.clone());
        settings.default_provider = Some(self.default_provider);

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
