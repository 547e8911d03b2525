//! Authorization window and completion message ports
//!
//! The login flow drives a detached window through these traits so the state
//! machine is independent of how the environment actually shows a browser or
//! delivers the provider's completion signal. Listeners are single-shot:
//! the flow consumes at most one matching message per attempt and drops the
//! listener on every exit path, so a completed or abandoned attempt cannot
//! leave a subscription behind.

use async_trait::async_trait;
use url::Url;

use crate::domain::result::Result;
use crate::domain::Provider;

/// Completion payload delivered once the provider flow finishes
///
/// Anything that does not carry this exact shape is noise and never reaches
/// the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    pub provider: Provider,
    pub email: String,
}

/// A detached window under the login flow's control
pub trait AuthorizationWindow: Send {
    /// Point the window at the provider authorization URL
    fn navigate(&mut self, url: &Url) -> Result<()>;

    /// Whether the user has closed the window
    ///
    /// Environments that cannot observe closure report `false`; the attempt
    /// then ends via the completion message or supersession only.
    fn is_closed(&self) -> bool;

    /// Close the window. Must be safe to call more than once.
    fn close(&mut self);
}

/// Opens detached windows
///
/// `open` failing is the "popup blocked" condition, distinct from network
/// failure because the remedy differs.
pub trait WindowOpener: Send + Sync {
    fn open(&self) -> Result<Box<dyn AuthorizationWindow>>;
}

/// One registered subscription for completion messages
#[async_trait]
pub trait CompletionListener: Send {
    /// Local port the backend's completion hop should target, if any
    fn relay_port(&self) -> Option<u16>;

    /// Wait for the next well-formed message; `None` means the channel is
    /// gone and no message will ever arrive.
    async fn recv(&mut self) -> Option<CompletionMessage>;
}

/// Registers completion listeners
pub trait CompletionSubscriber: Send + Sync {
    fn subscribe(&self) -> Result<Box<dyn CompletionListener>>;
}
