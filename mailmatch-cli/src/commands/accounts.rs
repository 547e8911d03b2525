//! Accounts command - list linked accounts

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let snapshot = ctx.coordinator.refresh().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.accounts)?);
        return Ok(());
    }

    if snapshot.accounts.is_empty() {
        println!(
            "{}",
            "No accounts linked. Use 'mm login' to link one.".yellow()
        );
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Address", "Provider"]);
    for account in &snapshot.accounts {
        match account.parts() {
            Some((address, provider)) => {
                table.add_row(vec![address, provider.as_str()]);
            }
            // Unrecognized label shape: show it verbatim rather than hide it
            None => {
                table.add_row(vec![account.as_str(), "?"]);
            }
        }
    }
    println!("{}", table);

    Ok(())
}
