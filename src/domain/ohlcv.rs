//! OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// (open + close) / 2, the intraday reference price used by exit rules.
    pub fn midpoint(&self) -> f64 {
        (self.open + self.close) / 2.0
    }
}
