//! External trade file parsing port.

use crate::domain::error::ReconError;
use crate::domain::format::ExternalFormat;
use crate::domain::parse_result::ParsedTrades;
use std::path::Path;

/// Reads an external file into normalized records.
///
/// Only an unreadable file is an error; malformed rows or messages come back
/// as warnings inside [`ParsedTrades`].
pub trait TradeFilePort {
    fn format(&self) -> ExternalFormat;

    fn parse_file(&self, path: &Path) -> Result<ParsedTrades, ReconError>;
}
