//! Moving-average preparation.
//!
//! Indicator computation is an input-preparation step: strategies consume a
//! [`PreparedSeries`] whose average columns were computed here before any
//! simulation runs. Warm-up steps (fewer than `period` closes seen) carry no
//! value, and any signal touching an absent value evaluates false.

use std::collections::BTreeMap;

use crate::domain::ohlcv::OhlcvBar;

/// A price series with simple-moving-average columns keyed by period,
/// following the `MA{period}` naming convention of the input format.
#[derive(Debug, Clone)]
pub struct PreparedSeries {
    pub bars: Vec<OhlcvBar>,
    averages: BTreeMap<usize, Vec<Option<f64>>>,
}

impl PreparedSeries {
    /// Copy `bars` and attach an average column for each requested period.
    /// Duplicate periods are computed once.
    pub fn prepare(bars: &[OhlcvBar], periods: &[usize]) -> Self {
        let mut averages = BTreeMap::new();
        for &period in periods {
            averages
                .entry(period)
                .or_insert_with(|| calc_sma(bars, period));
        }
        PreparedSeries {
            bars: bars.to_vec(),
            averages,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn has_average(&self, period: usize) -> bool {
        self.averages.contains_key(&period)
    }

    /// The MA{period} value at step `i`, if the column exists and `i` is past
    /// its warm-up window.
    pub fn average(&self, period: usize, i: usize) -> Option<f64> {
        self.averages
            .get(&period)
            .and_then(|column| column.get(i).copied().flatten())
    }
}

/// Rolling mean of close prices. The first `period - 1` steps have no value.
pub fn calc_sma(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; bars.len()];
    }

    let mut out = Vec::with_capacity(bars.len());
    let mut window_sum = 0.0;
    for i in 0..bars.len() {
        window_sum += bars[i].close;
        if i >= period {
            window_sum -= bars[i - period].close;
        }
        if i + 1 >= period {
            out.push(Some(window_sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}
