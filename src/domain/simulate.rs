//! Single-pass Flat/Long simulation loop shared by all strategy variants.

use crate::domain::error::MasweepError;
use crate::domain::indicator::PreparedSeries;
use crate::domain::strategy::Strategy;
use crate::domain::trajectory::{PositionState, Trajectory, TrajectoryStep};

/// Walk the series once, applying the strategy's entry/exit signals.
///
/// Entries fill at the triggering step's open, exits at its close; a step
/// may open and close the same round trip, but an exit step never re-enters.
/// Series shorter than two bars yield the degenerate all-Flat trajectory
/// rather than an error. The caller's series is never mutated.
pub fn simulate(
    strategy: &dyn Strategy,
    series: &PreparedSeries,
) -> Result<Trajectory, MasweepError> {
    for period in strategy.required_periods() {
        if !series.has_average(period) {
            return Err(MasweepError::MissingIndicator { period });
        }
    }

    let bars = &series.bars;
    let base_close = bars.first().map(|b| b.close).unwrap_or(0.0);
    let buy_hold: Vec<f64> = bars.iter().map(|b| b.close - base_close).collect();
    let mut steps = vec![TrajectoryStep::flat(); bars.len()];

    if bars.len() < 2 {
        return Ok(Trajectory { steps, buy_hold });
    }

    let mut position = PositionState::Flat;
    let mut entry_price = 0.0;
    let mut cum_return = 0.0;

    for t in 1..bars.len() {
        if position == PositionState::Flat && strategy.entry_signal(series, t) {
            entry_price = bars[t].open;
            position = PositionState::Long;
        }

        let mut trade_return = 0.0;
        if position == PositionState::Long && strategy.exit_signal(series, t) {
            trade_return = bars[t].close - entry_price;
            cum_return += trade_return;
            position = PositionState::Flat;
            entry_price = 0.0;
        }

        let equity = match position {
            PositionState::Long => cum_return + (bars[t].close - entry_price),
            PositionState::Flat => cum_return,
        };

        steps[t] = TrajectoryStep {
            position,
            trade_return,
            equity,
        };
    }

    Ok(Trajectory { steps, buy_hold })
}
