//! End-to-end reconciliation.
//!
//! Picks a parser for the external file, compares its records against the
//! authoritative set and hands the discrepancy list to a report writer. Each
//! run builds its own parser, so engines can be shared across threads.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::interchange_adapter::InterchangeAdapter;
use crate::domain::comparator::{Comparator, DuplicateKey};
use crate::domain::discrepancy::Discrepancy;
use crate::domain::error::ReconError;
use crate::domain::format::ExternalFormat;
use crate::domain::parse_result::ParseWarning;
use crate::domain::trade::TradeRecord;
use crate::ports::report_port::ReportPort;
use crate::ports::trade_file_port::TradeFilePort;
use crate::ports::trade_source_port::TradeSourcePort;

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationResult {
    pub left_count: usize,
    pub right_count: usize,
    /// `left_count - discrepancies.len()`; negative when the right side
    /// contributes more one-sided keys than the left has records.
    pub matched: i64,
    /// Keys present on both sides with no field differences.
    pub clean_matches: usize,
    pub discrepancies: Vec<Discrepancy>,
    pub warnings: Vec<ParseWarning>,
    pub duplicate_keys: Vec<DuplicateKey>,
}

impl ReconciliationResult {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine {
    comparator: Comparator,
}

impl ReconciliationEngine {
    pub fn new(comparator: Comparator) -> Self {
        Self { comparator }
    }

    /// Reconciles `left` against the external file at `external`.
    ///
    /// The format tag is checked before the file is opened, so an unknown
    /// tag fails with [`ReconError::UnsupportedFormat`] even when the path
    /// does not exist.
    pub fn reconcile(
        &self,
        left: &[TradeRecord],
        external: &Path,
        format: &str,
    ) -> Result<ReconciliationResult, ReconError> {
        let format: ExternalFormat = format.parse()?;
        self.reconcile_format(left, external, format)
    }

    pub fn reconcile_format(
        &self,
        left: &[TradeRecord],
        external: &Path,
        format: ExternalFormat,
    ) -> Result<ReconciliationResult, ReconError> {
        let parser = parser_for(format)?;
        tracing::info!(
            format = %parser.format(),
            path = %external.display(),
            tolerance = %self.comparator.tolerance(),
            "parsing external trades"
        );
        let parsed = parser.parse_file(external)?;

        let comparison = self.comparator.compare_detailed(left, &parsed.records);

        let matched = left.len() as i64 - comparison.discrepancies.len() as i64;
        let result = ReconciliationResult {
            left_count: left.len(),
            right_count: parsed.records.len(),
            matched,
            clean_matches: comparison.clean_matches,
            discrepancies: comparison.discrepancies,
            warnings: parsed.warnings,
            duplicate_keys: comparison.duplicate_keys,
        };
        tracing::info!(
            left = result.left_count,
            right = result.right_count,
            matched = result.matched,
            discrepancies = result.discrepancies.len(),
            warnings = result.warnings.len(),
            "reconciliation complete"
        );
        Ok(result)
    }

    /// Fetches the authoritative set from `source`, then reconciles.
    pub fn reconcile_from_source(
        &self,
        source: &dyn TradeSourcePort,
        external: &Path,
        format: &str,
    ) -> Result<ReconciliationResult, ReconError> {
        let format: ExternalFormat = format.parse()?;
        let left = source.fetch_trades()?;
        self.reconcile_format(&left, external, format)
    }

    /// Renders and persists the report for `result`.
    ///
    /// A write failure comes back as [`ReconError::Persistence`]; `result`
    /// is borrowed and stays usable either way.
    pub fn generate_report(
        &self,
        result: &ReconciliationResult,
        output_path: &Path,
        writer: &dyn ReportPort,
    ) -> Result<PathBuf, ReconError> {
        writer.write(&result.discrepancies, output_path)?;
        Ok(output_path.to_path_buf())
    }
}

/// The file parser for `format`.
pub fn parser_for(format: ExternalFormat) -> Result<Box<dyn TradeFilePort>, ReconError> {
    Ok(match format {
        ExternalFormat::Tabular => Box::new(CsvAdapter::new()),
        ExternalFormat::Interchange => Box::new(InterchangeAdapter::new()?),
    })
}
