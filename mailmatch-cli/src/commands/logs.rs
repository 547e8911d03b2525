//! Logs command - show recent activity

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(limit: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let events = ctx.event_log.recent(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No activity recorded yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Detail", ""]);
    for event in events {
        let marker = if event.success {
            String::new()
        } else {
            "!".red().to_string()
        };
        table.add_row(vec![
            event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:?}", event.kind),
            event.detail.unwrap_or_default(),
            marker,
        ]);
    }
    println!("{}", table);

    Ok(())
}
