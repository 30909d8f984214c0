//! Tabular (CSV) trade file adapter.

use crate::domain::error::ReconError;
use crate::domain::format::ExternalFormat;
use crate::domain::header_rules::{
    canonical_header, COUNTERPARTY, CURRENCY, INSTRUMENT, NOTIONAL, STATUS, TRADE_DATE, TRADE_ID,
};
use crate::domain::parse_result::{ParsedTrades, WarningLocation};
use crate::domain::trade::{parse_amount, TradeDate, TradeRecord, TradeSource};
use crate::ports::trade_file_port::TradeFilePort;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_STATUS: &str = "Unknown";

pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parses already-loaded text. Never fails; problems become warnings.
    pub fn parse_str(&self, content: &str) -> ParsedTrades {
        let mut parsed = ParsedTrades::default();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = match rdr.headers() {
            Ok(h) => h.iter().map(canonical_header).collect(),
            Err(e) => {
                parsed.warn(WarningLocation::File, format!("unreadable header row: {e}"));
                return parsed;
            }
        };
        if headers.iter().all(|h| h.is_empty()) {
            parsed.warn(WarningLocation::File, "missing header row");
            return parsed;
        }
        tracing::debug!(?headers, "normalized tabular headers");

        let mut columns: HashMap<&str, usize> = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            columns.entry(name.as_str()).or_insert(i);
        }

        for (index, result) in rdr.records().enumerate() {
            let row = index + 1;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    parsed.warn(WarningLocation::Row(row), format!("skipped: {e}"));
                    continue;
                }
            };
            if record.len() != headers.len() {
                parsed.warn(
                    WarningLocation::Row(row),
                    format!("expected {} fields, found {}", headers.len(), record.len()),
                );
            }

            let field = |name: &str| -> Option<String> {
                columns
                    .get(name)
                    .and_then(|&i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            };

            let notional = match field(NOTIONAL) {
                Some(text) => match parse_amount(&text) {
                    Some(v) => v,
                    None => {
                        parsed.warn(
                            WarningLocation::Row(row),
                            format!("unparsable notional '{text}', using 0"),
                        );
                        Decimal::ZERO
                    }
                },
                None => Decimal::ZERO,
            };

            parsed.records.push(TradeRecord {
                id: field(TRADE_ID).unwrap_or_else(|| format!("EXTERNAL-{row}")),
                trade_date: TradeDate::from_field(field(TRADE_DATE).as_deref()),
                counterparty: field(COUNTERPARTY),
                instrument: field(INSTRUMENT),
                notional,
                currency: field(CURRENCY),
                status: field(STATUS).or_else(|| Some(DEFAULT_STATUS.to_string())),
                source: TradeSource::ExternalCsv,
                message_type: None,
            });
        }

        tracing::info!(
            trades = parsed.records.len(),
            warnings = parsed.warnings.len(),
            "parsed tabular trades"
        );
        parsed
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeFilePort for CsvAdapter {
    fn format(&self) -> ExternalFormat {
        ExternalFormat::Tabular
    }

    fn parse_file(&self, path: &Path) -> Result<ParsedTrades, ReconError> {
        let content = fs::read_to_string(path).map_err(|e| ReconError::io(path, e))?;
        Ok(self.parse_str(&content))
    }
}
