//! Login flow - drives one popup-driven authorization attempt
//!
//! An attempt moves Idle -> UrlRequested -> PopupOpened and exits either
//! Completed (a matching completion message arrived) or Abandoned (the user
//! closed the window, or a newer attempt superseded this one). No attempt
//! state survives the exit.
//!
//! Three event sources race while the popup is open: the completion message
//! channel, the closed-window poll, and new login requests. They reconcile
//! here: the listener is registered before navigation and consumed
//! single-shot, the poll runs on a fixed interval, and a generation counter
//! makes a superseded attempt close its own window and bow out silently, so
//! two listeners can never both fire a success callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::result::Result;
use crate::domain::{AccountId, Provider};
use crate::ports::{CompletionSubscriber, WindowOpener};
use crate::services::RegistryService;

/// How often the flow checks whether the user closed the popup
const POPUP_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Where an authorization attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    UrlRequested,
    PopupOpened,
}

/// How an attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The provider flow finished for this account
    Completed(AccountId),
    /// The popup closed (or was superseded) before any message arrived.
    /// Silent: the UI owes the user no feedback for this.
    Abandoned,
}

/// Popup authorization flow
pub struct LoginFlow {
    registry: Arc<RegistryService>,
    opener: Arc<dyn WindowOpener>,
    subscriber: Arc<dyn CompletionSubscriber>,
    generation: AtomicU64,
    state: Mutex<AttemptState>,
}

impl LoginFlow {
    pub fn new(
        registry: Arc<RegistryService>,
        opener: Arc<dyn WindowOpener>,
        subscriber: Arc<dyn CompletionSubscriber>,
    ) -> Self {
        Self {
            registry,
            opener,
            subscriber,
            generation: AtomicU64::new(0),
            state: Mutex::new(AttemptState::Idle),
        }
    }

    /// Current attempt state, for UI gating
    pub fn state(&self) -> AttemptState {
        *self.state.lock().unwrap()
    }

    /// Run one authorization attempt for `provider`
    ///
    /// At most one attempt is live per flow: starting a new one supersedes
    /// any pending attempt, which closes its window and exits `Abandoned` on
    /// its next poll tick. URL-request failure and a blocked window both
    /// surface as errors (the latter as the distinct
    /// [`crate::Error::PopupBlocked`]); an abandoned popup is not an error.
    pub async fn login(&self, provider: Provider) -> Result<LoginOutcome> {
        let my_gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(my_gen, AttemptState::UrlRequested);

        // Register the listener before the window exists so a completion
        // message can never slip past the attempt.
        let mut listener = match self.subscriber.subscribe() {
            Ok(l) => l,
            Err(e) => {
                self.set_state(my_gen, AttemptState::Idle);
                return Err(e);
            }
        };

        let url = match self
            .registry
            .authorization_url(provider, listener.relay_port())
            .await
        {
            Ok(url) => url,
            Err(e) => {
                self.set_state(my_gen, AttemptState::Idle);
                return Err(e);
            }
        };

        let mut window = match self.opener.open() {
            Ok(w) => w,
            Err(e) => {
                self.set_state(my_gen, AttemptState::Idle);
                return Err(e);
            }
        };
        self.set_state(my_gen, AttemptState::PopupOpened);

        if let Err(e) = window.navigate(&url) {
            window.close();
            self.set_state(my_gen, AttemptState::Idle);
            return Err(e);
        }

        let mut poll = tokio::time::interval(POPUP_POLL_INTERVAL);
        let outcome = loop {
            tokio::select! {
                message = listener.recv() => match message {
                    Some(m) if m.provider == provider => {
                        if self.superseded(my_gen) {
                            break LoginOutcome::Abandoned;
                        }
                        break LoginOutcome::Completed(
                            AccountId::from_parts(&m.email, m.provider),
                        );
                    }
                    // A message for some other provider is incidental
                    // traffic, not a failure: keep waiting.
                    Some(_) => {}
                    None => break LoginOutcome::Abandoned,
                },
                _ = poll.tick() => {
                    if self.superseded(my_gen) || window.is_closed() {
                        break LoginOutcome::Abandoned;
                    }
                }
            }
        };

        window.close();
        self.set_state(my_gen, AttemptState::Idle);
        // listener drops here, deregistering the subscription
        Ok(outcome)
    }

    fn superseded(&self, my_gen: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != my_gen
    }

    /// Publish a state change unless a newer attempt owns the flow
    fn set_state(&self, my_gen: u64, state: AttemptState) {
        if !self.superseded(my_gen) {
            *self.state.lock().unwrap() = state;
        }
    }
}
