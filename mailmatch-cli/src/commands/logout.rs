//! Logout command - drop the local session

use anyhow::Result;
use dialoguer::Confirm;

use mailmatch_core::EventKind;

use super::{get_context, log_event};
use crate::output;

pub fn run(force: bool) -> Result<()> {
    let ctx = get_context()?;

    if !ctx.session.has_session() {
        println!("No session to drop.");
        return Ok(());
    }

    if !force
        && !Confirm::new()
            .with_prompt("Drop the local session? Linked accounts stay linked on the backend.")
            .default(true)
            .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.session.clear_session()?;
    log_event(&ctx, EventKind::SessionCleared, true, None);
    output::success("Session dropped.");
    Ok(())
}
