//! Price-series access port trait.

use crate::domain::error::MasweepError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Load an ordered daily series from `source` (adapter-defined, e.g. a
    /// CSV path). Implementations return bars sorted by date.
    fn load_series(&self, source: &str) -> Result<Vec<OhlcvBar>, MasweepError>;
}
