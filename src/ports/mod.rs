//! Port traits at the I/O seams of a reconciliation run.

pub mod config_port;
pub mod report_port;
pub mod trade_file_port;
pub mod trade_source_port;
