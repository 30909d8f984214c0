//! Core domain types and logic.

pub mod trade;
pub mod parse_result;
pub mod header_rules;
pub mod interchange;
pub mod discrepancy;
pub mod comparator;
pub mod format;
pub mod config_validation;
pub mod error;
