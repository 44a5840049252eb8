//! Concrete port implementations.

pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
