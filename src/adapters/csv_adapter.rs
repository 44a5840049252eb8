//! CSV file data adapter.
//!
//! Expects a header row followed by `date,open,high,low,close,volume`
//! records with ISO dates. Bars are sorted by date on load.

use std::fs;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::error::MasweepError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter;

fn field<T: FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, MasweepError>
where
    T::Err: std::fmt::Display,
{
    let raw = record.get(index).ok_or_else(|| MasweepError::DataLoad {
        reason: format!("missing {name} column"),
    })?;
    raw.trim().parse().map_err(|e| MasweepError::DataLoad {
        reason: format!("invalid {name} value {raw:?}: {e}"),
    })
}

impl DataPort for CsvAdapter {
    fn load_series(&self, source: &str) -> Result<Vec<OhlcvBar>, MasweepError> {
        let content = fs::read_to_string(source).map_err(|e| MasweepError::DataLoad {
            reason: format!("failed to read {source}: {e}"),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| MasweepError::DataLoad {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str: String = field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                MasweepError::DataLoad {
                    reason: format!("invalid date {date_str:?}: {e}"),
                }
            })?;

            bars.push(OhlcvBar {
                date,
                open: field(&record, 1, "open")?,
                high: field(&record, 2, "high")?,
                low: field(&record, 3, "low")?,
                close: field(&record, 4, "close")?,
                volume: field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
