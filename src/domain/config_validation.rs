//! Configuration validation.
//!
//! Checks every reconciliation setting before a run touches any file.

use crate::domain::error::ReconError;
use crate::domain::format::ExternalFormat;
use crate::ports::config_port::ConfigPort;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub fn validate_reconcile_config(config: &dyn ConfigPort) -> Result<(), ReconError> {
    validate_with_format_override(config, false)
}

/// Same checks, minus `[external] format` when the command line names one.
pub fn validate_with_format_override(
    config: &dyn ConfigPort,
    format_overridden: bool,
) -> Result<(), ReconError> {
    if !format_overridden {
        validate_format(config)?;
    }
    validate_tolerance(config)?;
    validate_paths(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn validate_format(config: &dyn ConfigPort) -> Result<(), ReconError> {
    match config.get_string("external", "format") {
        Some(f) => f
            .parse::<ExternalFormat>()
            .map(|_| ())
            .map_err(|_| ReconError::ConfigInvalid {
                section: "external".to_string(),
                key: "format".to_string(),
                reason: format!("unsupported format '{f}', expected tabular or interchange"),
            }),
        None => Ok(()),
    }
}

/// Reads `[comparison] notional_tolerance`, `None` when unset.
pub fn parse_tolerance(config: &dyn ConfigPort) -> Result<Option<Decimal>, ReconError> {
    let Some(raw) = config.get_string("comparison", "notional_tolerance") else {
        return Ok(None);
    };
    let invalid = |reason: &str| ReconError::ConfigInvalid {
        section: "comparison".to_string(),
        key: "notional_tolerance".to_string(),
        reason: reason.to_string(),
    };
    let value = Decimal::from_str(raw.trim()).map_err(|_| invalid("not a decimal number"))?;
    if value.is_sign_negative() {
        return Err(invalid("notional_tolerance must be non-negative"));
    }
    Ok(Some(value))
}

fn validate_tolerance(config: &dyn ConfigPort) -> Result<(), ReconError> {
    parse_tolerance(config).map(|_| ())
}

fn validate_paths(config: &dyn ConfigPort) -> Result<(), ReconError> {
    for (section, key) in [("internal", "trades_file"), ("external", "file"), ("report", "output")] {
        if let Some(v) = config.get_string(section, key) {
            if v.trim().is_empty() {
                return Err(ReconError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: "path must not be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), ReconError> {
    match config.get_string("logging", "level") {
        Some(level) if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) => {
            Err(ReconError::ConfigInvalid {
                section: "logging".to_string(),
                key: "level".to_string(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            })
        }
        _ => Ok(()),
    }
}
