//! CSV sweep report adapter.
//!
//! Writes one row per trial: parameter columns in draw order, then the
//! fixed metric columns of [`PerformanceRecord`].

use crate::domain::error::MasweepError;
use crate::domain::metrics::PerformanceRecord;
use crate::domain::sensitivity::SensitivityRun;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

fn report_err(path: &str, e: impl std::fmt::Display) -> MasweepError {
    MasweepError::Report {
        reason: format!("failed to write {path}: {e}"),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_runs(&self, runs: &[SensitivityRun], output_path: &str) -> Result<(), MasweepError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| report_err(output_path, e))?;

        if let Some(first) = runs.first() {
            let header: Vec<&str> = first
                .params
                .iter()
                .map(|(name, _)| name.as_str())
                .chain(PerformanceRecord::FIELD_NAMES)
                .collect();
            wtr.write_record(&header)
                .map_err(|e| report_err(output_path, e))?;

            for run in runs {
                let row: Vec<String> = run
                    .params
                    .iter()
                    .map(|(_, value)| value.to_string())
                    .chain(run.record.field_values().iter().map(|v| v.to_string()))
                    .collect();
                wtr.write_record(&row)
                    .map_err(|e| report_err(output_path, e))?;
            }
        }

        wtr.flush().map_err(|e| report_err(output_path, e))
    }
}
