//! Sweep report output port trait.

use crate::domain::error::MasweepError;
use crate::domain::sensitivity::SensitivityRun;

/// Port for persisting a sweep's result table. Implementations only read
/// the runs; computation state is never mutated by reporting.
pub trait ReportPort {
    fn write_runs(&self, runs: &[SensitivityRun], output_path: &str) -> Result<(), MasweepError>;
}
