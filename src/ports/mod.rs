//! Port traits decoupling domain logic from IO.

pub mod config_port;
pub mod data_port;
pub mod report_port;
