//! Account synchronization coordinator
//!
//! Single source of truth for "currently linked accounts" and "currently
//! selected accounts", and the only writer of that state. Every mutation is
//! applied as one transition: the selection is filtered against the account
//! list inside the same lock, so observers can never see a selected entry
//! that is not also listed.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{AccountId, Provider};
use crate::services::{LoginFlow, LoginOutcome, RegistryService};

/// Published coordinator state at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Linked accounts, in backend order
    pub accounts: Vec<AccountId>,
    /// Chosen subset, in the order the user picked them. Always a subset of
    /// `accounts`.
    pub selected: Vec<AccountId>,
}

#[derive(Default)]
struct State {
    accounts: Vec<AccountId>,
    selected: Vec<AccountId>,
    /// Bumped on every applied write; an async operation applies its result
    /// only if the epoch it captured is still current, so a stale response
    /// arriving late is discarded rather than applied.
    epoch: u64,
    refresh_in_flight: bool,
}

impl State {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.clone(),
            selected: self.selected.clone(),
        }
    }

    fn apply_accounts(&mut self, accounts: Vec<AccountId>) {
        // Replace wholesale, then keep only still-listed selections in
        // their previous relative order.
        self.accounts = accounts;
        let accounts = &self.accounts;
        self.selected.retain(|a| accounts.contains(a));
        self.epoch += 1;
    }
}

/// Account synchronization coordinator
pub struct AccountCoordinator {
    registry: Arc<RegistryService>,
    login: Arc<LoginFlow>,
    state: Mutex<State>,
}

impl AccountCoordinator {
    pub fn new(registry: Arc<RegistryService>, login: Arc<LoginFlow>) -> Self {
        Self {
            registry,
            login,
            state: Mutex::new(State::default()),
        }
    }

    /// Current published state
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().unwrap().snapshot()
    }

    /// Re-fetch the account list and republish it
    ///
    /// A refresh that starts while another is outstanding is ignored and
    /// returns the current snapshot; the outstanding one will publish. A
    /// refresh whose response arrives after an intervening write is stale
    /// and discarded.
    pub async fn refresh(&self) -> Snapshot {
        let started_at = {
            let mut state = self.state.lock().unwrap();
            if state.refresh_in_flight {
                return state.snapshot();
            }
            state.refresh_in_flight = true;
            state.epoch
        };

        let accounts = self.registry.list_accounts().await;

        let mut state = self.state.lock().unwrap();
        state.refresh_in_flight = false;
        if state.epoch == started_at {
            state.apply_accounts(accounts);
        }
        state.snapshot()
    }

    /// Flip one account in or out of the selection
    ///
    /// No-op for an account that is not currently listed.
    pub fn toggle(&self, account: &AccountId) -> Snapshot {
        let mut state = self.state.lock().unwrap();
        if state.accounts.contains(account) {
            if let Some(pos) = state.selected.iter().position(|a| a == account) {
                state.selected.remove(pos);
            } else {
                state.selected.push(account.clone());
            }
            state.epoch += 1;
        }
        state.snapshot()
    }

    /// Unlink an account and publish the post-disconnect list and filtered
    /// selection as one transition
    pub async fn disconnect(&self, account: &AccountId) -> Result<Snapshot> {
        let remaining = self.registry.disconnect(account).await?;
        let mut state = self.state.lock().unwrap();
        state.apply_accounts(remaining);
        Ok(state.snapshot())
    }

    /// Run a login attempt; a completed attempt triggers exactly one refresh
    ///
    /// Returns the linked account on completion, `None` when the attempt was
    /// abandoned (no refresh, no error).
    pub async fn login(&self, provider: Provider) -> Result<Option<AccountId>> {
        match self.login.login(provider).await? {
            LoginOutcome::Completed(account) => {
                self.refresh().await;
                Ok(Some(account))
            }
            LoginOutcome::Abandoned => Ok(None),
        }
    }
}
