//! Command handlers behind the `vitaltrack` subcommands.

use anyhow::{bail, Context, Result};
use chrono::{Local, Timelike, Utc};
use std::path::PathBuf;
use tracing::debug;

use vitaltrack_core::{Config, Identity, Reading, ADMIN_DISPLAY_NAME};
use vitaltrack_report::{
    account_audit_title, default_file_name, Overview, ReportContext, ReportFormat,
    ReportRenderer, MASTER_AUDIT_TITLE, PERSONAL_REPORT_TITLE,
};
use vitaltrack_storage::Ledger;

use crate::cli::{AdminCommand, Command};
use crate::session::{greeting, Session};
use crate::terminal::Terminal;

pub struct App {
    config: Config,
    ledger: Ledger,
    terminal: Terminal,
    renderer: ReportRenderer,
}

impl App {
    pub fn new(config: Config, ledger: Ledger, terminal: Terminal) -> Result<Self> {
        Ok(Self {
            config,
            ledger,
            terminal,
            renderer: ReportRenderer::new()?,
        })
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        debug!(?command, "Running command");
        match command {
            Command::Login { name, password } => self.login(&name, password).await,
            Command::Logout => self.logout(),
            Command::Add { systolic, diastolic } => self.add(&systolic, &diastolic).await,
            Command::History { limit } => self.history(limit).await,
            Command::Trend { last } => self.trend(last).await,
            Command::Export { format, out } => self.export(&format, out).await,
            Command::Admin { command } => self.admin(command).await,
        }
    }

    fn data_dir(&self) -> &std::path::Path {
        &self.config.storage.data_dir
    }

    /// The logged-in identity, or an error telling the user to log in.
    fn current(&self) -> Result<Identity> {
        match Session::load(self.data_dir())? {
            Some(session) => Ok(session.identity()),
            None => bail!("not logged in (run `vitaltrack login <name>`)"),
        }
    }

    fn require_user(&self) -> Result<Identity> {
        let identity = self.current()?;
        if identity.is_admin() {
            bail!("the admin account does not record readings; log in as a user");
        }
        Ok(identity)
    }

    fn require_admin(&self) -> Result<Identity> {
        let identity = self.current()?;
        if !identity.is_admin() {
            bail!("admin session required");
        }
        Ok(identity)
    }

    async fn login(&self, name: &str, password: Option<String>) -> Result<()> {
        let is_admin = name.trim().eq_ignore_ascii_case(&self.config.accounts.admin_username);
        let password = match password {
            Some(p) => p,
            None if is_admin => String::new(),
            None => self.terminal.prompt_password(name.trim())?,
        };

        let identity = self.ledger.login(name, &password).await?;
        Session::new(identity.clone()).save(self.data_dir())?;
        self.terminal.print_greeting(greeting(Local::now().hour()), &identity)
    }

    fn logout(&self) -> Result<()> {
        if Session::clear(self.data_dir())? {
            self.terminal.print_info("Logged out.")
        } else {
            self.terminal.print_info("No active session.")
        }
    }

    async fn add(&self, systolic: &str, diastolic: &str) -> Result<()> {
        let identity = self.require_user()?;
        let reading = Reading::parse(systolic, diastolic)?;
        let record = self.ledger.submit(&identity.username, reading).await?;
        self.terminal.print_record(&record)
    }

    async fn history(&self, limit: Option<usize>) -> Result<()> {
        let identity = self.require_user()?;
        let mut records = self.ledger.history(&identity.username).await?;
        records.reverse();
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        self.terminal.print_history(&records)
    }

    async fn trend(&self, last: usize) -> Result<()> {
        let identity = self.require_user()?;
        let records = self.ledger.history(&identity.username).await?;
        let start = records.len().saturating_sub(last);
        self.terminal.print_trend(&records[start..])
    }

    async fn export(&self, format: &str, out: Option<PathBuf>) -> Result<()> {
        let identity = self.require_user()?;
        let format: ReportFormat = format.parse()?;
        let records = self.ledger.history(&identity.username).await?;

        let ctx = ReportContext::personal(PERSONAL_REPORT_TITLE, &identity.username, &records, Utc::now());
        let path = out.unwrap_or_else(|| self.default_report_path(&identity.username, format));
        let written = self.renderer.write(format, &ctx, &path)?;
        self.terminal.print_success(&format!("Report saved to {}", written.display()))
    }

    async fn admin(&self, command: AdminCommand) -> Result<()> {
        self.require_admin()?;
        match command {
            AdminCommand::Overview { activity } => {
                let histories = self.ledger.histories().await?;
                let overview = Overview::build(&histories);
                self.terminal.print_overview(&overview, activity)
            }
            AdminCommand::Export { user, format, out } => {
                let format: ReportFormat = format.parse()?;
                let (ctx, file_stem) = match user {
                    Some(user) => {
                        let records = self.ledger.history(&user).await?;
                        if records.is_empty() && !self.account_exists(&user).await? {
                            bail!("no account named '{}'", user);
                        }
                        let title = account_audit_title(&user);
                        let histories = [(user, records)];
                        let ctx = ReportContext::audit(&title, ADMIN_DISPLAY_NAME, &histories, Utc::now());
                        (ctx, title)
                    }
                    None => {
                        let histories = self.ledger.histories().await?;
                        let ctx = ReportContext::audit(MASTER_AUDIT_TITLE, ADMIN_DISPLAY_NAME, &histories, Utc::now());
                        (ctx, "Master_Audit".to_string())
                    }
                };
                let path = out.unwrap_or_else(|| self.default_report_path(&file_stem, format));
                let written = self.renderer.write(format, &ctx, &path)?;
                self.terminal.print_success(&format!("Audit saved to {}", written.display()))
            }
            AdminCommand::Delete { name } => {
                let removed = self
                    .ledger
                    .delete_account(&name)
                    .await
                    .with_context(|| format!("failed to delete '{}'", name))?;
                if removed {
                    self.terminal.print_success(&format!("Deleted account '{}'", name))
                } else {
                    bail!("no account named '{}'", name)
                }
            }
        }
    }

    async fn account_exists(&self, username: &str) -> Result<bool> {
        let users = self.ledger.users().await?;
        Ok(users.iter().any(|u| u == username))
    }

    fn default_report_path(&self, name: &str, format: ReportFormat) -> PathBuf {
        self.config.storage.report_dir.join(default_file_name(name, format))
    }
}
