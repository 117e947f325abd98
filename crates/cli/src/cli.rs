use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Blood-pressure tracker with sensor-error and tampering detection.
///
/// Every reading is classified against the user's own history before it
/// is stored: physiologically impossible values are flagged as sensor
/// errors, statistical outliers as possible data attacks.
#[derive(Parser, Debug)]
#[command(name = "vitaltrack", version, about = "Blood-pressure tracker with anomaly detection")]
pub struct CliArgs {
    /// Config profile (reads `{PROFILE}_DATA_DIR` etc. before `DATA_DIR`)
    #[arg(long, global = true, env = "VITALTRACK_PROFILE")]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a session. The admin name needs no password.
    Login {
        name: String,

        /// Password (prompted for when omitted)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// End the current session
    Logout,

    /// Record a reading, e.g. `vitaltrack add 120 80`
    #[command(allow_negative_numbers = true)]
    Add { systolic: String, diastolic: String },

    /// Show stored readings, newest first
    History {
        /// Only show the newest N readings
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Chart systolic and diastolic values over time
    Trend {
        /// Number of most recent readings to plot
        #[arg(long, default_value = "30")]
        last: usize,
    },

    /// Export your readings as a report
    Export {
        /// Report format: text or html
        #[arg(long, short, default_value = "text")]
        format: String,

        /// Output path (default: REPORT_DIR/VitalTrack_<user>_Report.<ext>)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Administrator commands
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Usage statistics, account integrity and recent activity
    Overview {
        /// Number of activity entries to show
        #[arg(long, default_value = "15")]
        activity: usize,
    },

    /// Export a security audit across all accounts, or one account
    Export {
        /// Restrict the audit to one account
        #[arg(long)]
        user: Option<String>,

        /// Report format: text or html
        #[arg(long, short, default_value = "text")]
        format: String,

        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Delete an account with its history and credential
    Delete { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let args = CliArgs::try_parse_from(["vitaltrack", "add", "120", "80"]).unwrap();
        match args.command {
            Command::Add { systolic, diastolic } => {
                assert_eq!(systolic, "120");
                assert_eq!(diastolic, "80");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_admin_export() {
        let args = CliArgs::try_parse_from([
            "vitaltrack", "admin", "export", "--user", "bob", "--format", "html",
        ])
        .unwrap();
        match args.command {
            Command::Admin { command: AdminCommand::Export { user, format, out } } => {
                assert_eq!(user.as_deref(), Some("bob"));
                assert_eq!(format, "html");
                assert!(out.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
