//! Scripted in-memory adapters for unit tests
//!
//! Network IO is mocked at the trait level: the mock backend keeps the
//! authoritative account list in memory and counts calls so tests can assert
//! on exactly how many probes and issuance requests a flow made.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountId, Provider, SessionId};
use crate::ports::{
    AuthorizationWindow, BackendApi, CompletionListener, CompletionMessage, CompletionSubscriber,
    CsvUpload, ProcessOutcome, SessionStorage, WindowOpener,
};

// ============================================================================
// Session storage
// ============================================================================

/// In-memory session storage
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<SessionId>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<SessionId>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn store(&self, id: &SessionId) -> Result<()> {
        *self.inner.lock().unwrap() = Some(id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}

// ============================================================================
// Backend
// ============================================================================

#[derive(Default)]
struct MockState {
    accounts: Vec<AccountId>,
    valid: HashSet<String>,
    queued_sessions: VecDeque<String>,
    issue_calls: usize,
    list_calls: usize,
    auth_calls: usize,
    disconnected: Vec<AccountId>,
    relay_ports: Vec<Option<u16>>,
    listing_delay: Option<std::time::Duration>,
    fail_issuance: bool,
    fail_listing: bool,
    fail_auth_url: bool,
    fail_disconnect: Option<u16>,
    process_outcome: Option<ProcessOutcome>,
}

/// Scripted backend
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a session id as accepted by the listing endpoint
    pub fn accept_session(&self, id: &str) {
        self.state.lock().unwrap().valid.insert(id.to_string());
    }

    /// Queue the next id the issuance endpoint hands out
    pub fn queue_session(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .queued_sessions
            .push_back(id.to_string());
    }

    pub fn set_accounts(&self, labels: &[&str]) {
        self.state.lock().unwrap().accounts = labels.iter().map(|l| AccountId::from(*l)).collect();
    }

    /// Make listing calls take this long, to stage overlapping fetches
    pub fn delay_listing(&self, delay: std::time::Duration) {
        self.state.lock().unwrap().listing_delay = Some(delay);
    }

    pub fn fail_issuance(&self) {
        self.state.lock().unwrap().fail_issuance = true;
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    pub fn fail_auth_url(&self) {
        self.state.lock().unwrap().fail_auth_url = true;
    }

    pub fn fail_disconnect(&self, status: u16) {
        self.state.lock().unwrap().fail_disconnect = Some(status);
    }

    pub fn set_process_outcome(&self, outcome: ProcessOutcome) {
        self.state.lock().unwrap().process_outcome = Some(outcome);
    }

    pub fn issue_calls(&self) -> usize {
        self.state.lock().unwrap().issue_calls
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn auth_calls(&self) -> usize {
        self.state.lock().unwrap().auth_calls
    }

    pub fn disconnected(&self) -> Vec<AccountId> {
        self.state.lock().unwrap().disconnected.clone()
    }

    pub fn relay_ports(&self) -> Vec<Option<u16>> {
        self.state.lock().unwrap().relay_ports.clone()
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn issue_session(&self) -> Result<SessionId> {
        let mut state = self.state.lock().unwrap();
        state.issue_calls += 1;
        if state.fail_issuance {
            return Err(Error::transport("HTTP 500"));
        }
        let id = state
            .queued_sessions
            .pop_front()
            .unwrap_or_else(|| format!("session-{}", state.issue_calls));
        state.valid.insert(id.clone());
        Ok(SessionId::new(id))
    }

    async fn list_accounts(&self, session: &SessionId) -> Result<Vec<AccountId>> {
        let delay = self.state.lock().unwrap().listing_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_listing {
            return Err(Error::transport("HTTP 500"));
        }
        if !state.valid.contains(session.as_str()) {
            return Err(Error::transport("HTTP 401"));
        }
        Ok(state.accounts.clone())
    }

    async fn authorization_url(
        &self,
        _session: &SessionId,
        provider: Provider,
        relay_port: Option<u16>,
    ) -> Result<Url> {
        let mut state = self.state.lock().unwrap();
        state.auth_calls += 1;
        state.relay_ports.push(relay_port);
        if state.fail_auth_url {
            return Err(Error::transport("HTTP 502"));
        }
        Ok(Url::parse(&format!("https://provider.example/auth/{}", provider)).unwrap())
    }

    async fn disconnect(&self, _session: &SessionId, account: &AccountId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.fail_disconnect {
            return Err(Error::Disconnect { status });
        }
        state.disconnected.push(account.clone());
        state.accounts.retain(|a| a != account);
        Ok(())
    }

    async fn process(&self, _session: &SessionId, _upload: CsvUpload) -> Result<ProcessOutcome> {
        let state = self.state.lock().unwrap();
        state
            .process_outcome
            .clone()
            .ok_or_else(|| Error::Process("no outcome scripted".to_string()))
    }
}

// ============================================================================
// Window
// ============================================================================

/// Observable state of one scripted window
#[derive(Default)]
pub struct WindowProbe {
    closed: AtomicBool,
    navigated: Mutex<Option<Url>>,
}

impl WindowProbe {
    /// Simulate the user closing the window
    pub fn close_by_user(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn navigated_to(&self) -> Option<Url> {
        self.navigated.lock().unwrap().clone()
    }
}

struct MockWindow {
    probe: Arc<WindowProbe>,
}

impl AuthorizationWindow for MockWindow {
    fn navigate(&mut self, url: &Url) -> Result<()> {
        *self.probe.navigated.lock().unwrap() = Some(url.clone());
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.probe.is_closed()
    }

    fn close(&mut self) {
        self.probe.closed.store(true, Ordering::SeqCst);
    }
}

/// Window opener handing out scripted windows
#[derive(Default)]
pub struct MockOpener {
    blocked: AtomicBool,
    windows: Mutex<Vec<Arc<WindowProbe>>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent open fail, like a popup blocker would
    pub fn block(&self) {
        self.blocked.store(true, Ordering::SeqCst);
    }

    /// Probe for the most recently opened window
    pub fn last_window(&self) -> Option<Arc<WindowProbe>> {
        self.windows.lock().unwrap().last().cloned()
    }

    pub fn opened_count(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}

impl WindowOpener for MockOpener {
    fn open(&self) -> Result<Box<dyn AuthorizationWindow>> {
        if self.blocked.load(Ordering::SeqCst) {
            return Err(Error::PopupBlocked("window creation refused".to_string()));
        }
        let probe = Arc::new(WindowProbe::default());
        self.windows.lock().unwrap().push(probe.clone());
        Ok(Box::new(MockWindow { probe }))
    }
}

// ============================================================================
// Completion messages
// ============================================================================

/// Subscriber whose messages the test injects by hand
#[derive(Default)]
pub struct ChannelSubscriber {
    senders: Mutex<Vec<mpsc::UnboundedSender<CompletionMessage>>>,
}

impl ChannelSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a message to every live listener
    pub fn send(&self, message: CompletionMessage) {
        for sender in self.senders.lock().unwrap().iter() {
            let _ = sender.send(message.clone());
        }
    }

    /// Number of listeners still registered (dropped listeners close their
    /// channel)
    pub fn live_listeners(&self) -> usize {
        self.senders
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !s.is_closed())
            .count()
    }
}

struct ChannelListener {
    rx: mpsc::UnboundedReceiver<CompletionMessage>,
}

#[async_trait]
impl CompletionListener for ChannelListener {
    fn relay_port(&self) -> Option<u16> {
        None
    }

    async fn recv(&mut self) -> Option<CompletionMessage> {
        self.rx.recv().await
    }
}

impl CompletionSubscriber for ChannelSubscriber {
    fn subscribe(&self) -> Result<Box<dyn CompletionListener>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().push(tx);
        Ok(Box::new(ChannelListener { rx }))
    }
}
