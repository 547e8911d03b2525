//! Disconnect command - unlink an account

use anyhow::Result;
use dialoguer::Confirm;

use mailmatch_core::{AccountId, EventKind};

use super::{get_context, log_event};
use crate::output;

pub async fn run(account: &str, force: bool) -> Result<()> {
    let ctx = get_context()?;
    let account = AccountId::from(account);

    let snapshot = ctx.coordinator.refresh().await;
    if !snapshot.accounts.contains(&account) {
        output::warning(&format!("{} is not linked.", account));
        if !snapshot.accounts.is_empty() {
            println!("Linked accounts:");
            for a in &snapshot.accounts {
                println!("  - {}", a);
            }
        }
        return Ok(());
    }

    if !force
        && !Confirm::new()
            .with_prompt(format!("Unlink {}?", account))
            .default(false)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    match ctx.coordinator.disconnect(&account).await {
        Ok(snapshot) => {
            log_event(&ctx, EventKind::AccountDisconnected, true, None);
            output::success(&format!("Unlinked {}", account));
            if snapshot.accounts.is_empty() {
                output::info("No accounts left; the session was closed.");
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &ctx,
                EventKind::AccountDisconnected,
                false,
                Some(&e.to_string()),
            );
            Err(e.into())
        }
    }
}
