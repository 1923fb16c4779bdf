//! Report rendering for extraction snapshots

use std::borrow::Cow;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;

use crate::engine::{ExtractionResult, ReportSnapshot};
use crate::error::ReportError;

/// Timestamp layout used by every format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header prefix used when none is configured.
pub const DEFAULT_TITLE: &str = "ราคาประจำวัน:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Header line, then one `label : value` line per field
    PlainText,
    /// Single JSON object
    Json,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "plaintext" | "text" => Ok(ReportFormat::PlainText),
            "json" => Ok(ReportFormat::Json),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Renders snapshots with a configurable header title.
#[derive(Debug, Clone)]
pub struct Reporter {
    title: String,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    captured_at: String,
    results: &'a [ExtractionResult],
}

impl Reporter {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    /// Render `snapshot`. Every field gets a line, found or not.
    pub fn render(
        &self,
        snapshot: ReportSnapshot,
        format: ReportFormat,
    ) -> Result<String, ReportError> {
        let captured_at = snapshot.captured_at().format(TIMESTAMP_FORMAT).to_string();

        match format {
            ReportFormat::PlainText => {
                let mut out = String::new();
                // Writing to a String cannot fail
                let _ = writeln!(out, "{} {}", one_line(&self.title), captured_at);
                for result in snapshot.results() {
                    let label = one_line(&result.label);
                    let _ = writeln!(out, "{} : {}", label, one_line(&result.value));
                }
                Ok(out)
            }
            ReportFormat::Json => {
                let report = JsonReport {
                    captured_at,
                    results: snapshot.results(),
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
        }
    }

    /// Render using a format name; unknown names fail with `UnsupportedFormat`.
    pub fn render_named(
        &self,
        snapshot: ReportSnapshot,
        format: &str,
    ) -> Result<String, ReportError> {
        let format = format.parse::<ReportFormat>()?;
        self.render(snapshot, format)
    }
}

// Line breaks would split one field over several report lines
fn one_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(text.replace("\r\n", " ").replace(['\n', '\r'], " "))
    } else {
        Cow::Borrowed(text)
    }
}
