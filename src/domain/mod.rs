//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod trajectory;
pub mod strategy;
pub mod simulate;
pub mod metrics;
pub mod sensitivity;
pub mod sweep_config;
pub mod error;
