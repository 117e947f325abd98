use anyhow::Result;
use chrono::Local;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

use vitaltrack_core::{Identity, Record};
use vitaltrack_report::{Integrity, Overview};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const SUCCESS: Color = Color::Green;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
    const SECURE: Color = Color::Green;
    const COMPROMISED: Color = Color::Red;
}

/// Lowest and highest pressure shown on the trend chart, in mmHg.
pub const TREND_MIN: f64 = 40.0;
pub const TREND_MAX: f64 = 200.0;
const TREND_ROWS: usize = 17;

/// Parse a `#rrggbb` severity color.
pub fn hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

fn severity_color(record: &Record) -> Color {
    hex_color(&record.classification.severity_color).unwrap_or(Color::Reset)
}

/// Pressure level labelling each chart row, top row first.
pub fn trend_levels() -> Vec<f64> {
    let step = (TREND_MAX - TREND_MIN) / (TREND_ROWS - 1) as f64;
    (0..TREND_ROWS).map(|row| TREND_MAX - row as f64 * step).collect()
}

/// Chart row a value lands on. Values outside the domain stick to the edge.
pub fn trend_row(value: f64) -> usize {
    let step = (TREND_MAX - TREND_MIN) / (TREND_ROWS - 1) as f64;
    let clamped = value.clamp(TREND_MIN, TREND_MAX);
    ((TREND_MAX - clamped) / step).round() as usize
}

/// Marker for one record in one chart row.
pub fn trend_marker(record: &Record, row: usize) -> char {
    match (trend_row(record.systolic) == row, trend_row(record.diastolic) == row) {
        (true, true) => '*',
        (true, false) => 'S',
        (false, true) => 'D',
        (false, false) => ' ',
    }
}

/// Terminal output for the `vitaltrack` commands.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the login greeting.
    pub fn print_greeting(&self, greeting: &str, identity: &Identity) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print(format!("{}, {}", greeting, identity.username)),
            ResetColor,
            SetForegroundColor(Colors::DIM),
            Print(format!(" ({})\n", identity.role)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Ask for a password on stdin.
    pub fn prompt_password(&self, name: &str) -> Result<String> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::PROMPT),
            Print(format!("Password for {}: ", name)),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Print the outcome of a submitted reading. Flagged readings are shown
    /// as an alert in their severity color.
    pub fn print_record(&self, record: &Record) -> Result<()> {
        let mut stdout = io::stdout();
        let c = &record.classification;
        if c.is_flagged() {
            execute!(
                stdout,
                SetForegroundColor(severity_color(record)),
                Print(format!("!! {}\n", c.message)),
                Print(format!("   {} ({})\n", record.reading(), c.medical_label)),
                ResetColor,
            )?;
        } else {
            execute!(
                stdout,
                Print(format!("Recorded {}: ", record.reading())),
                SetForegroundColor(severity_color(record)),
                Print(&c.medical_label),
                ResetColor,
                SetForegroundColor(Colors::DIM),
                Print(format!("\n{}\n", c.message)),
                ResetColor,
            )?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Print records in the order given, one colored row each.
    pub fn print_history(&self, records: &[Record]) -> Result<()> {
        let mut stdout = io::stdout();
        if records.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print("No readings recorded yet.\n"),
                ResetColor,
            )?;
            return Ok(());
        }

        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{:<17} {:<10} {:<28} {}\n",
                "TIME", "READING", "DIAGNOSIS", "STATUS"
            )),
            Print(format!("{}\n", "-".repeat(90))),
            ResetColor,
        )?;

        for r in records {
            let local = r.timestamp.with_timezone(&Local);
            execute!(
                stdout,
                Print(format!(
                    "{:<17} {:<10} ",
                    local.format("%Y-%m-%d %H:%M"),
                    r.reading().to_string()
                )),
                SetForegroundColor(severity_color(r)),
                Print(format!(
                    "{:<28} {}\n",
                    r.classification.medical_label, r.classification.message
                )),
                ResetColor,
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    /// Plot systolic (S) and diastolic (D) values, oldest on the left.
    /// Markers take the reading's severity color.
    pub fn print_trend(&self, records: &[Record]) -> Result<()> {
        let mut stdout = io::stdout();
        if records.is_empty() {
            return self.print_info("No readings to chart yet.");
        }

        for (row, level) in trend_levels().into_iter().enumerate() {
            execute!(
                stdout,
                SetForegroundColor(Colors::DIM),
                Print(format!("{:>4} |", level.round() as i64)),
                ResetColor,
            )?;
            for r in records {
                let marker = trend_marker(r, row);
                execute!(
                    stdout,
                    Print(' '),
                    SetForegroundColor(severity_color(r)),
                    Print(marker),
                    ResetColor,
                    Print(' '),
                )?;
            }
            execute!(stdout, Print("\n"))?;
        }

        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("     +{}\n", "-".repeat(records.len() * 3))),
            Print(format!(
                "      S systolic  D diastolic  * both  ({} readings)\n",
                records.len()
            )),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print the admin overview: totals, per-account integrity, recent activity.
    pub fn print_overview(&self, overview: &Overview, activity: usize) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("System Overview\n"),
            ResetColor,
            Print(format!(
                "Total records: {}  Active users: {}/{}  Threats detected: {}  Sensor errors: {}\n\n",
                overview.total_records,
                overview.active_users,
                overview.accounts,
                overview.threats_detected,
                overview.sensor_errors,
            )),
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "{:<20} {:<6} {:<12} {:<8} {}\n",
                "ACCOUNT", "LOGS", "INTEGRITY", "SENSOR", "WORST"
            )),
            Print(format!("{}\n", "-".repeat(80))),
            ResetColor,
        )?;

        for a in &overview.account_rows {
            let integrity_color = match a.integrity {
                Integrity::Secure => Colors::SECURE,
                Integrity::Compromised => Colors::COMPROMISED,
            };
            let worst = a
                .worst_band
                .map(|b| b.label().to_string())
                .unwrap_or_else(|| "-".to_string());
            execute!(
                stdout,
                Print(format!("{:<20} {:<6} ", a.username, a.logs)),
                SetForegroundColor(integrity_color),
                Print(format!("{:<12}", a.integrity.to_string())),
                ResetColor,
                Print(format!(" {:<8} {}\n", a.sensor_errors, worst)),
            )?;
        }

        let recent = overview.recent_activity(activity);
        if !recent.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Colors::HEADER),
                Print("\nRecent activity\n"),
                ResetColor,
            )?;
            for e in recent {
                execute!(
                    stdout,
                    SetForegroundColor(Colors::DIM),
                    Print(format!(
                        "{} ",
                        e.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    )),
                    ResetColor,
                    Print(format!("{:<16} {:<10} {}\n", e.username, e.reading, e.status)),
                )?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    pub fn print_success(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::SUCCESS),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}
