//! Minijinja rendering of reading reports.
//!
//! The text and HTML templates are compiled into the binary and registered
//! under names ending in `.txt` / `.html`, so minijinja's default
//! auto-escape applies HTML escaping to the HTML report only.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::context::ReportContext;
use crate::error::ReportError;

const TEXT_TEMPLATE: &str = include_str!("templates/report.txt");
const HTML_TEMPLATE: &str = include_str!("templates/report.html");

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Html => "html",
        }
    }

    fn template_name(&self) -> &'static str {
        match self {
            ReportFormat::Text => "report.txt",
            ReportFormat::Html => "report.html",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "html" | "htm" => Ok(ReportFormat::Html),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Default export file name for a user's report.
pub fn default_file_name(username: &str, format: ReportFormat) -> String {
    let safe: String = username
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("VitalTrack_{}_Report.{}", safe, format.extension())
}

/// Renders reports from a [`ReportContext`].
pub struct ReportRenderer {
    env: minijinja::Environment<'static>,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, ReportError> {
        Ok(Self { env: Self::build_env()? })
    }

    /// Build a configured minijinja environment with the report templates
    /// and custom filters.
    fn build_env() -> Result<minijinja::Environment<'static>, ReportError> {
        let mut env = minijinja::Environment::new();
        env.add_filter("pad", pad_filter);
        env.add_template(ReportFormat::Text.template_name(), TEXT_TEMPLATE)?;
        env.add_template(ReportFormat::Html.template_name(), HTML_TEMPLATE)?;
        Ok(env)
    }

    pub fn render(&self, format: ReportFormat, ctx: &ReportContext) -> Result<String, ReportError> {
        let template = self.env.get_template(format.template_name())?;
        Ok(template.render(ctx)?)
    }

    /// Render and write to `path`, creating parent directories.
    pub fn write(
        &self,
        format: ReportFormat,
        ctx: &ReportContext,
        path: &Path,
    ) -> Result<PathBuf, ReportError> {
        let body = self.render(format, ctx)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, body)?;
        info!(path = %path.display(), rows = ctx.rows.len(), %format, "report written");
        Ok(path.to_path_buf())
    }
}

/// Custom filter: left-align a value in a column of `width` characters,
/// always leaving at least one space after it.
fn pad_filter(value: String, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        format!("{} ", value)
    } else {
        format!("{}{}", value, " ".repeat(width - len))
    }
}
