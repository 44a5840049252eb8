//! Strategy variants and their entry/exit signals.
//!
//! Each variant is a validated parameter set plus the pair of signals the
//! simulation loop evaluates per step. Period orderings are checked at
//! construction; a misordered config never reaches the simulator.

use crate::domain::error::MasweepError;
use crate::domain::indicator::PreparedSeries;

/// A strategy names the averages it needs and supplies the entry/exit
/// signals evaluated by [`crate::domain::simulate::simulate`].
///
/// Signals must use only information available at or before step `t`.
pub trait Strategy: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Periods whose MA columns must exist in the prepared series.
    fn required_periods(&self) -> Vec<usize>;

    /// Flat→Long trigger at step `t`. Entry fills at `t`'s open.
    fn entry_signal(&self, series: &PreparedSeries, t: usize) -> bool;

    /// Long→Flat trigger at step `t`. Exit fills at `t`'s close.
    fn exit_signal(&self, series: &PreparedSeries, t: usize) -> bool;
}

impl<T: Strategy + ?Sized> Strategy for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn required_periods(&self) -> Vec<usize> {
        (**self).required_periods()
    }

    fn entry_signal(&self, series: &PreparedSeries, t: usize) -> bool {
        (**self).entry_signal(series, t)
    }

    fn exit_signal(&self, series: &PreparedSeries, t: usize) -> bool {
        (**self).exit_signal(series, t)
    }
}

/// Triple moving-average alignment.
///
/// Enters when yesterday's averages were in strict bullish order
/// (short > medium > long); ties do not count. Exits when today's short
/// average falls below the medium average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripleMa {
    short: usize,
    medium: usize,
    long: usize,
}

impl TripleMa {
    pub fn new(short: usize, medium: usize, long: usize) -> Result<Self, MasweepError> {
        if short == 0 {
            return Err(MasweepError::StrategyInvalid {
                reason: "periods must be positive".into(),
            });
        }
        if short >= medium || medium >= long {
            return Err(MasweepError::StrategyInvalid {
                reason: format!(
                    "periods must satisfy short < medium < long, got {short}/{medium}/{long}"
                ),
            });
        }
        Ok(TripleMa {
            short,
            medium,
            long,
        })
    }
}

impl Strategy for TripleMa {
    fn name(&self) -> &'static str {
        "triple-ma"
    }

    fn required_periods(&self) -> Vec<usize> {
        vec![self.short, self.medium, self.long]
    }

    fn entry_signal(&self, series: &PreparedSeries, t: usize) -> bool {
        if t < 1 {
            return false;
        }
        match (
            series.average(self.short, t - 1),
            series.average(self.medium, t - 1),
            series.average(self.long, t - 1),
        ) {
            (Some(short), Some(medium), Some(long)) => short > medium && medium > long,
            _ => false,
        }
    }

    fn exit_signal(&self, series: &PreparedSeries, t: usize) -> bool {
        match (
            series.average(self.short, t),
            series.average(self.medium, t),
        ) {
            (Some(short), Some(medium)) => short < medium,
            _ => false,
        }
    }
}

/// Dual moving-average golden cross.
///
/// Enters on a cross strictly between `t-2` and `t-1`: the short average
/// below the long at `t-2` and above it at `t-1`. Exits when today's
/// (open + close) / 2 midpoint drops below the short average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaCross {
    short: usize,
    long: usize,
}

impl MaCross {
    pub fn new(short: usize, long: usize) -> Result<Self, MasweepError> {
        if short == 0 {
            return Err(MasweepError::StrategyInvalid {
                reason: "periods must be positive".into(),
            });
        }
        if short >= long {
            return Err(MasweepError::StrategyInvalid {
                reason: format!("periods must satisfy short < long, got {short}/{long}"),
            });
        }
        Ok(MaCross { short, long })
    }
}

impl Strategy for MaCross {
    fn name(&self) -> &'static str {
        "ma-cross"
    }

    fn required_periods(&self) -> Vec<usize> {
        vec![self.short, self.long]
    }

    fn entry_signal(&self, series: &PreparedSeries, t: usize) -> bool {
        if t < 2 {
            return false;
        }
        let before = (
            series.average(self.short, t - 2),
            series.average(self.long, t - 2),
        );
        let after = (
            series.average(self.short, t - 1),
            series.average(self.long, t - 1),
        );
        match (before, after) {
            ((Some(s0), Some(l0)), (Some(s1), Some(l1))) => s0 < l0 && s1 > l1,
            _ => false,
        }
    }

    fn exit_signal(&self, series: &PreparedSeries, t: usize) -> bool {
        match (series.bars.get(t), series.average(self.short, t)) {
            (Some(bar), Some(short)) => bar.midpoint() < short,
            _ => false,
        }
    }
}
