mod cli;
mod commands;
mod session;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use vitaltrack_core::config::load_dotenv;
use vitaltrack_core::Config;
use vitaltrack_rules::{ClassifierConfigRule, Classifier};
use vitaltrack_storage::{FileStore, Ledger};

use crate::cli::CliArgs;
use crate::commands::App;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    // .env must be loaded before clap reads env-backed flags
    load_dotenv();
    let args = CliArgs::parse();

    let config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    config.log_summary();

    let classifier = match &config.rules.path {
        Some(path) => {
            let compiled = ClassifierConfigRule::load(path)
                .with_context(|| format!("failed to load classifier rules: {}", path.display()))?;
            info!(path = %path.display(), "Loaded classifier rules");
            Classifier::new(&compiled)
        }
        None => Classifier::default(),
    };

    let store = FileStore::from_config(&config).context("failed to open account store")?;
    let ledger = Ledger::new(Arc::new(store), classifier)
        .with_admin_username(config.accounts.admin_username.clone());

    let app = App::new(config, ledger, Terminal::new()).context("failed to initialize reports")?;
    if let Err(e) = app.run(args.command).await {
        app.terminal().print_error(&format!("{:#}", e))?;
        std::process::exit(1);
    }
    Ok(())
}
