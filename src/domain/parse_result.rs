//! Parser output: normalized records plus the warnings collected on the way.

use crate::domain::trade::TradeRecord;
use serde::Serialize;
use std::fmt;

/// Where in an external file a warning was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLocation {
    File,
    /// 1-based data row, header excluded.
    Row(usize),
    /// 1-based message index.
    Message(usize),
    /// Byte offset into the raw text.
    Offset(usize),
}

impl fmt::Display for WarningLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningLocation::File => f.write_str("file"),
            WarningLocation::Row(n) => write!(f, "row {n}"),
            WarningLocation::Message(n) => write!(f, "message {n}"),
            WarningLocation::Offset(n) => write!(f, "offset {n}"),
        }
    }
}

/// A malformed row or message that was skipped or read leniently. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub location: WarningLocation,
    pub message: String,
}

impl ParseWarning {
    pub fn new(location: WarningLocation, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTrades {
    pub records: Vec<TradeRecord>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedTrades {
    pub fn warn(&mut self, location: WarningLocation, message: impl Into<String>) {
        let warning = ParseWarning::new(location, message);
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }
}
