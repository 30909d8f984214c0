//! Interchange (MT message) trade file adapter.

use crate::domain::error::ReconError;
use crate::domain::format::ExternalFormat;
use crate::domain::interchange::InterchangeReader;
use crate::domain::parse_result::ParsedTrades;
use crate::ports::trade_file_port::TradeFilePort;
use std::fs;
use std::path::Path;

pub struct InterchangeAdapter {
    reader: InterchangeReader,
}

impl InterchangeAdapter {
    pub fn new() -> Result<Self, ReconError> {
        Ok(Self {
            reader: InterchangeReader::new()?,
        })
    }

    pub fn parse_str(&self, content: &str) -> ParsedTrades {
        self.reader.read(content)
    }
}

impl TradeFilePort for InterchangeAdapter {
    fn format(&self) -> ExternalFormat {
        ExternalFormat::Interchange
    }

    fn parse_file(&self, path: &Path) -> Result<ParsedTrades, ReconError> {
        let content = fs::read_to_string(path).map_err(|e| ReconError::io(path, e))?;
        Ok(self.parse_str(&content))
    }
}
