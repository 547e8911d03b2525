//! Status command - session and linked-account summary

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let has_session = ctx.session.has_session();
    // Only hit the backend when a session exists; status must work offline
    // before first login.
    let snapshot = if has_session {
        ctx.coordinator.refresh().await
    } else {
        ctx.coordinator.snapshot()
    };

    if json {
        let status = serde_json::json!({
            "session": has_session,
            "api_url": ctx.config.api_url,
            "accounts": snapshot.accounts,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Mailmatch Status".bold());
    println!();

    let account_count = snapshot.accounts.len().to_string();
    let mut table = output::create_table();
    table.add_row(vec!["Backend", ctx.config.api_url.as_str()]);
    table.add_row(vec![
        "Session",
        if has_session { "established" } else { "none" },
    ]);
    table.add_row(vec!["Linked accounts", account_count.as_str()]);
    println!("{}", table);

    if !snapshot.accounts.is_empty() {
        println!();
        println!("{}", "Linked Accounts".bold());
        for account in &snapshot.accounts {
            println!("  - {}", account);
        }
    } else if has_session {
        println!();
        println!(
            "{}",
            "No accounts linked. Use 'mm login' to link one.".yellow()
        );
    }

    Ok(())
}
