//! System browser window and loopback completion relay
//!
//! A native client has no window.opener channel, so the completion message
//! takes one extra hop: `subscribe` binds an ephemeral loopback port, the
//! port rides along with the authorization-URL request, and the backend's
//! callback page delivers `GET /complete?provider=..&email=..` there once
//! the provider flow finishes. Requests without that exact shape are
//! answered and dropped, never forwarded.

use std::sync::Arc;

use async_trait::async_trait;
use tiny_http::{Header, Response, Server};
use tokio::sync::mpsc;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::ports::{
    AuthorizationWindow, CompletionListener, CompletionMessage, CompletionSubscriber, WindowOpener,
};

const COMPLETION_PAGE: &str = "<!DOCTYPE html>\
<html><head><title>Account linked</title></head>\
<body style=\"font-family:system-ui;text-align:center;padding:80px 20px\">\
<h2>Account linked</h2><p>You can close this window and return to the terminal.</p>\
</body></html>";

// ============================================================================
// System browser window
// ============================================================================

/// Opens authorization windows in the system browser
#[derive(Debug, Default)]
pub struct SystemWindowOpener;

impl SystemWindowOpener {
    pub fn new() -> Self {
        Self
    }
}

impl WindowOpener for SystemWindowOpener {
    fn open(&self) -> Result<Box<dyn AuthorizationWindow>> {
        Ok(Box::new(SystemBrowserWindow))
    }
}

struct SystemBrowserWindow;

impl AuthorizationWindow for SystemBrowserWindow {
    fn navigate(&mut self, url: &Url) -> Result<()> {
        // Launch failure is this environment's "popup blocked": the remedy
        // is on the user's side, not the network's.
        webbrowser::open(url.as_str())
            .map_err(|e| Error::PopupBlocked(format!("Could not open a browser: {}", e)))
    }

    fn is_closed(&self) -> bool {
        // Closure of a system browser tab is not observable from here; the
        // attempt ends via the completion message, supersession, or the
        // user interrupting the command.
        false
    }

    fn close(&mut self) {
        // Cannot close the user's browser tab.
    }
}

// ============================================================================
// Loopback completion relay
// ============================================================================

/// Registers loopback listeners for completion messages
#[derive(Debug, Default)]
pub struct LoopbackRelay;

impl LoopbackRelay {
    pub fn new() -> Self {
        Self
    }
}

impl CompletionSubscriber for LoopbackRelay {
    fn subscribe(&self) -> Result<Box<dyn CompletionListener>> {
        let server = Server::http("127.0.0.1:0")
            .map_err(|e| Error::transport(format!("Failed to bind completion relay: {}", e)))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| Error::transport("Completion relay has no loopback address"))?;

        let server = Arc::new(server);
        let (tx, rx) = mpsc::unbounded_channel();
        {
            let server = Arc::clone(&server);
            std::thread::spawn(move || serve(&server, &tx));
        }

        Ok(Box::new(RelayListener { server, port, rx }))
    }
}

fn serve(server: &Server, tx: &mpsc::UnboundedSender<CompletionMessage>) {
    for request in server.incoming_requests() {
        let response = match parse_completion(request.url()) {
            Some(message) => {
                // Send fails only when the listener is already gone; the
                // page is answered either way.
                let _ = tx.send(message);
                let header = Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"text/html; charset=utf-8"[..],
                )
                .expect("static header");
                Response::from_string(COMPLETION_PAGE).with_header(header)
            }
            None => Response::from_string("ignored").with_status_code(404),
        };
        let _ = request.respond(response);
    }
}

/// Parse `GET /complete?provider=..&email=..`; anything else is noise
fn parse_completion(raw: &str) -> Option<CompletionMessage> {
    let url = Url::parse(&format!("http://127.0.0.1{}", raw)).ok()?;
    if url.path() != "/complete" {
        return None;
    }
    let mut provider: Option<crate::domain::Provider> = None;
    let mut email: Option<String> = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "provider" => provider = value.parse().ok(),
            "email" => {
                if !value.is_empty() {
                    email = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
    Some(CompletionMessage {
        provider: provider?,
        email: email?,
    })
}

struct RelayListener {
    server: Arc<Server>,
    port: u16,
    rx: mpsc::UnboundedReceiver<CompletionMessage>,
}

#[async_trait]
impl CompletionListener for RelayListener {
    fn relay_port(&self) -> Option<u16> {
        Some(self.port)
    }

    async fn recv(&mut self) -> Option<CompletionMessage> {
        self.rx.recv().await
    }
}

impl Drop for RelayListener {
    fn drop(&mut self) {
        // Deregister: stop accepting and let the serve thread exit.
        self.server.unblock();
    }
}
