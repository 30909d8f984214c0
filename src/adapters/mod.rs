//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod interchange_adapter;
pub mod json_trade_source;
pub mod text_report;
