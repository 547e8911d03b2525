//! Backend HTTP client
//!
//! Implements the BackendApi port against the mailmatch backend. Every
//! transport failure is converted into a domain error here; callers never
//! see a raw reqwest error.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountId, Provider, SessionId};
use crate::ports::{BackendApi, CsvUpload, ProcessOutcome};

/// Session header expected by every authenticated call
const SESSION_HEADER: &str = "X-Session-ID";

/// Default backend base URL (local development server)
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable to override the backend base URL
pub const BASE_URL_ENV: &str = "MAILMATCH_API_URL";

/// Get the backend base URL, checking the environment variable first
pub fn get_base_url() -> String {
    std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AuthUrlResponse {
    auth_url: String,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    digest_csv: String,
    exceptions_csv: String,
    digest_filename: String,
    exceptions_filename: String,
}

/// Backend HTTP client
#[derive(Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client against the configured base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::transport("Connection timed out")
        } else if error.is_connect() {
            Error::transport("Unable to connect to the mailmatch backend")
        } else {
            Error::transport(format!("Backend request failed: {}", error))
        }
    }

    fn check_response_status(&self, response: &Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::transport(format!("Session rejected: HTTP {}", status.as_u16())))
            }
            status => Err(Error::transport(format!("Backend error: HTTP {}", status.as_u16()))),
        }
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn issue_session(&self) -> Result<SessionId> {
        let response = self
            .client
            .post(self.url("/session"))
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;
        self.check_response_status(&response)?;

        let data: SessionResponse = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("Malformed session response: {}", e)))?;
        if data.session_id.is_empty() {
            return Err(Error::transport("Backend issued an empty session id"));
        }
        Ok(SessionId::new(data.session_id))
    }

    async fn list_accounts(&self, session: &SessionId) -> Result<Vec<AccountId>> {
        let response = self
            .client
            .get(self.url("/accounts"))
            .header(SESSION_HEADER, session.as_str())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;
        self.check_response_status(&response)?;

        // A malformed body counts as failure: validation relies on the
        // collection being well-formed.
        let data: AccountsResponse = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("Malformed accounts response: {}", e)))?;
        Ok(data.accounts.into_iter().map(AccountId::new).collect())
    }

    async fn authorization_url(
        &self,
        session: &SessionId,
        provider: Provider,
        relay_port: Option<u16>,
    ) -> Result<Url> {
        let mut request = self
            .client
            .get(self.url(&format!("/login/{}", provider)))
            .header(SESSION_HEADER, session.as_str());
        if let Some(port) = relay_port {
            request = request.query(&[("relay_port", port.to_string())]);
        }

        let response = request.send().await.map_err(|e| self.map_request_error(e))?;
        self.check_response_status(&response)?;

        let data: AuthUrlResponse = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("Malformed login response: {}", e)))?;
        Url::parse(&data.auth_url)
            .map_err(|e| Error::transport(format!("Backend returned an invalid auth URL: {}", e)))
    }

    async fn disconnect(&self, session: &SessionId, account: &AccountId) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/accounts"))
            .query(&[("account", account.as_str())])
            .header(SESSION_HEADER, session.as_str())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Disconnect {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn process(&self, session: &SessionId, upload: CsvUpload) -> Result<ProcessOutcome> {
        let file_part = Part::bytes(upload.content)
            .file_name(upload.filename)
            .mime_str("text/csv")
            .map_err(|e| Error::Process(format!("Invalid upload: {}", e)))?;

        let mut form = Form::new().part("file", file_part);
        // Backend expects one form field per selected account
        for account in &upload.accounts {
            form = form.text("accounts", account.as_str().to_string());
        }

        let response = self
            .client
            .post(self.url("/process"))
            .header(SESSION_HEADER, session.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(Error::Process(text));
        }

        let data: ProcessResponse = response
            .json()
            .await
            .map_err(|e| Error::Process(format!("Malformed process response: {}", e)))?;

        Ok(ProcessOutcome {
            digest_csv: decode_csv("digest", &data.digest_csv)?,
            exceptions_csv: decode_csv("exceptions", &data.exceptions_csv)?,
            digest_filename: data.digest_filename,
            exceptions_filename: data.exceptions_filename,
        })
    }
}

/// Decode one base64-wrapped CSV payload from the process response
fn decode_csv(name: &str, payload: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| Error::Process(format!("Invalid {} payload encoding", name)))
}
