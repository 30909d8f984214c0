//! tradematch: trade reconciliation.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`reconciliation`] wires the
//! parsers, comparator and report writer into one run.

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod reconciliation;
pub mod cli;
