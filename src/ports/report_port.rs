//! Report persistence port trait.

use crate::domain::discrepancy::Discrepancy;
use crate::domain::error::ReconError;
use std::path::Path;

/// Port for writing reconciliation reports.
pub trait ReportPort {
    /// Failures surface as [`ReconError::Persistence`].
    fn write(&self, discrepancies: &[Discrepancy], output_path: &Path) -> Result<(), ReconError>;
}
