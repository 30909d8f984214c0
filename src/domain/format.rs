//! External file format tags.

use crate::domain::error::ReconError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalFormat {
    /// Delimited text with a header row.
    Tabular,
    /// Raw MT interchange messages.
    Interchange,
}

impl ExternalFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalFormat::Tabular => "tabular",
            ExternalFormat::Interchange => "interchange",
        }
    }
}

impl fmt::Display for ExternalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExternalFormat {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tabular" | "csv" => Ok(ExternalFormat::Tabular),
            "interchange" | "swift" | "mt" => Ok(ExternalFormat::Interchange),
            _ => Err(ReconError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}
