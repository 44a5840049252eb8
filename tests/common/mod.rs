#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use masweep::domain::error::MasweepError;
pub use masweep::domain::ohlcv::OhlcvBar;
use masweep::ports::data_port::DataPort;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn make_bar(day_offset: i64, open: f64, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: date(2024, 1, 1) + chrono::Duration::days(day_offset),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume: 1000,
    }
}

/// Bars whose opens equal their closes.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as i64, close, close))
        .collect()
}

pub fn bars_from_open_close(opens: &[f64], closes: &[f64]) -> Vec<OhlcvBar> {
    assert_eq!(opens.len(), closes.len());
    opens
        .iter()
        .zip(closes)
        .enumerate()
        .map(|(i, (&open, &close))| make_bar(i as i64, open, close))
        .collect()
}

/// Strictly declining series of the given length.
pub fn declining_bars(len: usize) -> Vec<OhlcvBar> {
    bars_from_closes(
        &(0..len)
            .map(|i| 100.0 - 2.0 * i as f64)
            .collect::<Vec<f64>>(),
    )
}

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, source: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(source.to_string(), bars);
        self
    }

    pub fn with_error(mut self, source: &str, reason: &str) -> Self {
        self.errors.insert(source.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_series(&self, source: &str) -> Result<Vec<OhlcvBar>, MasweepError> {
        if let Some(reason) = self.errors.get(source) {
            return Err(MasweepError::DataLoad {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(source).cloned().unwrap_or_default())
    }
}
