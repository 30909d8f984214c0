//! Error taxonomy for reconciliation runs.
//!
//! Parse warnings are not errors; see [`crate::domain::parse_result`].

/// Top-level error type for tradematch.
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file format: {format} (expected tabular or interchange)")]
    UnsupportedFormat { format: String },

    #[error("failed to write report to {path}: {source}")]
    Persistence {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("trade source error: {reason}")]
    TradeSource { reason: String },

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ReconError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ReconError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn persistence(path: &std::path::Path, source: std::io::Error) -> Self {
        ReconError::Persistence {
            path: path.display().to_string(),
            source,
        }
    }
}

impl ReconError {
    /// Process exit status. 1 is reserved for "discrepancies found".
    pub fn exit_status(&self) -> u8 {
        match self {
            ReconError::Io { .. } => 2,
            ReconError::UnsupportedFormat { .. } => 3,
            ReconError::ConfigParse { .. }
            | ReconError::ConfigMissing { .. }
            | ReconError::ConfigInvalid { .. } => 4,
            ReconError::Persistence { .. } => 5,
            ReconError::TradeSource { .. } => 6,
            ReconError::Pattern(_) => 70,
        }
    }
}

impl From<&ReconError> for std::process::ExitCode {
    fn from(err: &ReconError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
