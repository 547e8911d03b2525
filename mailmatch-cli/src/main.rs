//! Mailmatch CLI - link mailboxes and reconcile transaction exports

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use mailmatch_core::Provider;

mod commands;
mod output;

use commands::{accounts, disconnect, login, logout, logs, process, status};

/// Mailmatch - match bank transactions against email receipts
#[derive(Parser)]
#[command(name = "mm", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show session and linked-account status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Link a mailbox through the provider's consent flow
    Login {
        /// Mail provider (gmail, outlook); defaults to the configured one
        provider: Option<Provider>,
    },

    /// List linked accounts
    Accounts {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Unlink an account
    Disconnect {
        /// Account label, e.g. "jane@x.com (gmail)"
        account: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Drop the local session
    Logout {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Reconcile a transaction CSV against fetched receipts
    Process {
        /// Path to the transaction CSV
        file: PathBuf,
        /// Accounts to search (defaults to an interactive pick)
        #[arg(long, value_delimiter = ',')]
        accounts: Vec<String>,
        /// Directory to write the result reports into
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent activity
    Logs {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json).await,
        Commands::Login { provider } => login::run(provider).await,
        Commands::Accounts { json } => accounts::run(json).await,
        Commands::Disconnect { account, force } => disconnect::run(&account, force).await,
        Commands::Logout { force } => logout::run(force),
        Commands::Process {
            file,
            accounts,
            out,
            json,
        } => process::run(&file, accounts, &out, json).await,
        Commands::Logs { limit, json } => logs::run(limit, json),
    }
}
