//! Performance metrics derived from one trajectory.

use crate::domain::trajectory::Trajectory;

/// Fixed-shape performance summary. Every field is always populated so
/// downstream tabulation never sees a missing column; trade-derived fields
/// are zero when no round trip was realized.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRecord {
    /// Last mark-to-market equity point.
    pub final_equity: f64,
    /// Sum of realized trade returns.
    pub net_profit: f64,
    /// Largest peak-to-trough decline of the equity curve, >= 0.
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    /// Sum of winning trades.
    pub total_profit: f64,
    /// Sum of losing trades; non-positive.
    pub total_loss: f64,
    pub largest_win: f64,
    /// Most negative single trade.
    pub largest_loss: f64,
    pub avg_win: f64,
    /// Negative when losing trades exist.
    pub avg_loss: f64,
    /// |avg_win / avg_loss|; +inf when winners exist and losers do not.
    pub profit_loss_ratio: f64,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
}

impl PerformanceRecord {
    /// Column names in field order, for tabular output.
    pub const FIELD_NAMES: [&'static str; 16] = [
        "final_equity",
        "net_profit",
        "max_drawdown",
        "total_trades",
        "winning_trades",
        "losing_trades",
        "win_rate",
        "total_profit",
        "total_loss",
        "largest_win",
        "largest_loss",
        "avg_win",
        "avg_loss",
        "profit_loss_ratio",
        "longest_win_streak",
        "longest_loss_streak",
    ];

    /// Values in [`Self::FIELD_NAMES`] order, counts widened to f64.
    pub fn field_values(&self) -> [f64; 16] {
        [
            self.final_equity,
            self.net_profit,
            self.max_drawdown,
            self.total_trades as f64,
            self.winning_trades as f64,
            self.losing_trades as f64,
            self.win_rate,
            self.total_profit,
            self.total_loss,
            self.largest_win,
            self.largest_loss,
            self.avg_win,
            self.avg_loss,
            self.profit_loss_ratio,
            self.longest_win_streak as f64,
            self.longest_loss_streak as f64,
        ]
    }

    pub fn compute(trajectory: &Trajectory) -> Self {
        let final_equity = trajectory.final_equity();
        let max_drawdown = compute_drawdown(trajectory.equity_curve());
        let trades = trajectory.trade_returns();

        if trades.is_empty() {
            return PerformanceRecord {
                final_equity,
                net_profit: 0.0,
                max_drawdown,
                total_trades: 0,
                winning_trades: 0,
                losing_trades: 0,
                win_rate: 0.0,
                total_profit: 0.0,
                total_loss: 0.0,
                largest_win: 0.0,
                largest_loss: 0.0,
                avg_win: 0.0,
                avg_loss: 0.0,
                profit_loss_ratio: 0.0,
                longest_win_streak: 0,
                longest_loss_streak: 0,
            };
        }

        let mut winning_trades = 0usize;
        let mut losing_trades = 0usize;
        let mut total_profit = 0.0_f64;
        let mut total_loss = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut longest_win_streak = 0usize;
        let mut longest_loss_streak = 0usize;
        let mut win_streak = 0usize;
        let mut loss_streak = 0usize;

        for &ret in &trades {
            if ret > 0.0 {
                winning_trades += 1;
                total_profit += ret;
                if ret > largest_win {
                    largest_win = ret;
                }
                win_streak += 1;
                loss_streak = 0;
            } else {
                losing_trades += 1;
                total_loss += ret;
                if ret < largest_loss {
                    largest_loss = ret;
                }
                loss_streak += 1;
                win_streak = 0;
            }
            longest_win_streak = longest_win_streak.max(win_streak);
            longest_loss_streak = longest_loss_streak.max(loss_streak);
        }

        let total_trades = trades.len();
        let win_rate = winning_trades as f64 / total_trades as f64;
        let avg_win = if winning_trades > 0 {
            total_profit / winning_trades as f64
        } else {
            0.0
        };
        let avg_loss = if losing_trades > 0 {
            total_loss / losing_trades as f64
        } else {
            0.0
        };
        let profit_loss_ratio = if avg_loss == 0.0 {
            f64::INFINITY
        } else {
            (avg_win / avg_loss).abs()
        };

        PerformanceRecord {
            final_equity,
            net_profit: total_profit + total_loss,
            max_drawdown,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            total_profit,
            total_loss,
            largest_win,
            largest_loss,
            avg_win,
            avg_loss,
            profit_loss_ratio,
            longest_win_streak,
            longest_loss_streak,
        }
    }
}

/// Maximum of (running peak - equity) over the curve; 0 for an empty or
/// non-decreasing curve.
fn compute_drawdown(equity: impl IntoIterator<Item = f64>) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for point in equity {
        if point > peak {
            peak = point;
        } else if peak - point > max_dd {
            max_dd = peak - point;
        }
    }
    max_dd
}
