//! Simulation output: per-step position, realized return, and equity.

/// End-of-step position. Long-only, at most one open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryStep {
    pub position: PositionState,
    /// Realized return of a round trip closed this step; 0.0 at every other step.
    pub trade_return: f64,
    /// Cumulative realized return plus the unrealized value of an open position.
    pub equity: f64,
}

impl TrajectoryStep {
    pub fn flat() -> Self {
        TrajectoryStep {
            position: PositionState::Flat,
            trade_return: 0.0,
            equity: 0.0,
        }
    }
}

/// One simulation's full output, aligned 1:1 with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub steps: Vec<TrajectoryStep>,
    /// close[i] - close[0], the buy-and-hold comparison curve.
    pub buy_hold: Vec<f64>,
}

impl Trajectory {
    /// The realized trade list: non-zero trade returns in step order.
    pub fn trade_returns(&self) -> Vec<f64> {
        self.steps
            .iter()
            .map(|s| s.trade_return)
            .filter(|r| *r != 0.0)
            .collect()
    }

    /// Last equity point, or 0 for an empty trajectory.
    pub fn final_equity(&self) -> f64 {
        self.steps.last().map(|s| s.equity).unwrap_or(0.0)
    }

    pub fn equity_curve(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().map(|s| s.equity)
    }
}
