//! Plain-text reconciliation report.
//!
//! [`render`] is a pure function of the discrepancy list and a timestamp
//! string; the timestamp appears only on the `Generated:` header line.
//! [`TextReportAdapter`] implements [`ReportPort`] by rendering with the
//! current UTC time and writing the result to disk.

pub mod sections;

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};

use crate::domain::discrepancy::Discrepancy;
use crate::domain::error::ReconError;
use crate::ports::report_port::ReportPort;

pub use sections::GENERATED_PREFIX;

/// Render the full report with an explicit generation timestamp.
pub fn render(discrepancies: &[Discrepancy], generated_at: &str) -> String {
    let mut out = String::new();
    sections::render_header(&mut out, generated_at);
    sections::render_summary(&mut out, discrepancies);
    sections::render_details(&mut out, discrepancies);
    out
}

/// Render the report stamped with the current UTC time.
pub fn generate(discrepancies: &[Discrepancy]) -> String {
    render(
        discrepancies,
        &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Drops the `Generated:` line so two reports can be compared byte for byte.
pub fn strip_timestamp(report: &str) -> String {
    report
        .lines()
        .filter(|l| !l.starts_with(GENERATED_PREFIX))
        .map(|l| format!("{l}\n"))
        .collect()
}

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, discrepancies: &[Discrepancy], output_path: &Path) -> Result<(), ReconError> {
        let report = generate(discrepancies);
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ReconError::persistence(output_path, e))?;
        }
        fs::write(output_path, report).map_err(|e| ReconError::persistence(output_path, e))?;
        tracing::info!(path = %output_path.display(), "report saved");
        Ok(())
    }
}
