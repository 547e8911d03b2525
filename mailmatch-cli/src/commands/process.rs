//! Process command - reconcile a transaction CSV against fetched receipts

use std::path::Path;

use anyhow::{bail, Context, Result};
use dialoguer::MultiSelect;
use indicatif::{ProgressBar, ProgressStyle};

use mailmatch_core::services::ProcessRequest;
use mailmatch_core::{AccountId, EventKind};

use super::{get_context, log_event};
use crate::output;

pub async fn run(file: &Path, accounts: Vec<String>, out: &Path, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let snapshot = ctx.coordinator.refresh().await;
    if snapshot.accounts.is_empty() {
        bail!("No accounts linked. Use 'mm login' to link one first.");
    }

    let selected = pick_accounts(&snapshot.accounts, accounts, json)?;
    if selected.is_empty() {
        bail!("No accounts selected.");
    }

    let request = ProcessRequest::from_file(file, selected.clone())
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(format!(
        "Matching {} against {} account(s)...",
        request.filename,
        selected.len()
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let result = ctx.process_service.process(request).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            log_event(&ctx, EventKind::ProcessRun, false, Some(&e.to_string()));
            return Err(e.into());
        }
    };
    log_event(&ctx, EventKind::ProcessRun, true, None);

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;
    let digest_path = out.join(&outcome.digest_filename);
    let exceptions_path = out.join(&outcome.exceptions_filename);
    std::fs::write(&digest_path, &outcome.digest_csv)
        .with_context(|| format!("Failed to write {}", digest_path.display()))?;
    std::fs::write(&exceptions_path, &outcome.exceptions_csv)
        .with_context(|| format!("Failed to write {}", exceptions_path.display()))?;

    if json {
        let summary = serde_json::json!({
            "digest": digest_path.to_string_lossy(),
            "exceptions": exceptions_path.to_string_lossy(),
            "accounts_searched": selected.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output::success("Reconciliation finished.");
    println!("  Digest:     {}", digest_path.display());
    println!("  Exceptions: {}", exceptions_path.display());

    Ok(())
}

/// Resolve which accounts to search: explicit labels win, otherwise an
/// interactive pick, otherwise every linked account
fn pick_accounts(
    linked: &[AccountId],
    explicit: Vec<String>,
    json: bool,
) -> Result<Vec<AccountId>> {
    if !explicit.is_empty() {
        let mut picked = Vec::new();
        for label in explicit {
            let id = AccountId::from(label.as_str());
            if !linked.contains(&id) {
                bail!("{} is not a linked account", id);
            }
            picked.push(id);
        }
        return Ok(picked);
    }

    if atty::is(atty::Stream::Stdin) && !json {
        let labels: Vec<&str> = linked.iter().map(|a| a.as_str()).collect();
        let chosen = MultiSelect::new()
            .with_prompt("Accounts to search (space to toggle, enter to confirm)")
            .items(&labels)
            .defaults(&vec![true; labels.len()])
            .interact()?;
        return Ok(chosen.into_iter().map(|i| linked[i].clone()).collect());
    }

    Ok(linked.to_vec())
}
