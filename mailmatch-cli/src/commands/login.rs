//! Login command - run the provider consent flow in the browser

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use mailmatch_core::{Error, EventKind, Provider};

use super::{get_context, log_event};
use crate::output;

pub async fn run(provider: Option<Provider>) -> Result<()> {
    let ctx = get_context()?;
    let provider = provider.unwrap_or(ctx.config.default_provider);

    output::info(&format!(
        "Opening the {} consent page in your browser...",
        provider
    ));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message("Waiting for the consent flow to finish (Ctrl-C to give up)");
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));

    let result = ctx.coordinator.login(provider).await;
    spinner.finish_and_clear();

    match result {
        Ok(Some(account)) => {
            log_event(
                &ctx,
                EventKind::LoginCompleted,
                true,
                Some(provider.as_str()),
            );
            output::success(&format!("Linked {}", account));
            Ok(())
        }
        Ok(None) => {
            log_event(
                &ctx,
                EventKind::LoginAbandoned,
                true,
                Some(provider.as_str()),
            );
            output::warning("Login abandoned; no account was linked.");
            Ok(())
        }
        Err(e @ Error::PopupBlocked(_)) => {
            log_event(&ctx, EventKind::LoginFailed, false, Some("browser_blocked"));
            Err(anyhow::anyhow!(
                "{}\nAllow the browser to open and try again.",
                e
            ))
        }
        Err(e) => {
            log_event(&ctx, EventKind::LoginFailed, false, Some(provider.as_str()));
            Err(e.into())
        }
    }
}
