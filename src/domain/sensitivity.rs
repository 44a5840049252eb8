//! Randomized parameter sensitivity sweeps.
//!
//! Each trial draws a parameter set from the configured ranges, builds a
//! strategy from the draw, simulates it on its own prepared copy of the
//! series, and reduces the result to one [`SensitivityRun`] row. Trials are
//! independent and run across the rayon pool; every trial seeds its own RNG
//! from the master seed and trial index, so the result set does not depend
//! on scheduling order.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::domain::error::MasweepError;
use crate::domain::indicator::PreparedSeries;
use crate::domain::metrics::PerformanceRecord;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::simulate::simulate;
use crate::domain::strategy::Strategy;

/// Re-draw budget per ordering constraint per trial. Exhausting it means the
/// configured ranges cannot satisfy the constraint.
pub const MAX_DRAW_ATTEMPTS: usize = 100;

/// A single parameter's sampling range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRange {
    /// Inclusive integer range (periods).
    Int(i64, i64),
    /// Real interval (thresholds, multipliers).
    Float(f64, f64),
}

impl ParamRange {
    fn draw(&self, rng: &mut StdRng) -> f64 {
        match *self {
            ParamRange::Int(lo, hi) => rng.gen_range(lo..=hi) as f64,
            ParamRange::Float(lo, hi) => rng.gen_range(lo..=hi),
        }
    }

    fn is_ordered(&self) -> bool {
        match *self {
            ParamRange::Int(lo, hi) => lo <= hi,
            ParamRange::Float(lo, hi) => lo <= hi,
        }
    }
}

/// Named parameter ranges plus cross-parameter ordering constraints.
#[derive(Debug, Clone, Default)]
pub struct ParamSpace {
    params: Vec<(String, ParamRange)>,
    /// (fast, slow) pairs: drawn(slow) must be strictly greater than drawn(fast).
    constraints: Vec<(String, String)>,
}

impl ParamSpace {
    pub fn new() -> Self {
        ParamSpace::default()
    }

    pub fn with_param(mut self, name: &str, range: ParamRange) -> Self {
        self.params.push((name.to_string(), range));
        self
    }

    pub fn with_constraint(mut self, fast: &str, slow: &str) -> Self {
        self.constraints.push((fast.to_string(), slow.to_string()));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|(n, _)| n == name)
    }

    /// Reject inverted ranges and constraints over unknown names before any
    /// trial runs.
    pub fn validate(&self) -> Result<(), MasweepError> {
        for (name, range) in &self.params {
            if !range.is_ordered() {
                return Err(MasweepError::ConfigInvalid {
                    section: "ranges".into(),
                    key: name.clone(),
                    reason: "min must not exceed max".into(),
                });
            }
        }
        for (fast, slow) in &self.constraints {
            for name in [fast, slow] {
                if self.index_of(name).is_none() {
                    return Err(MasweepError::UnknownParameter { name: name.clone() });
                }
            }
        }
        Ok(())
    }

    /// Draw one parameter set. A violated ordering constraint re-draws its
    /// slow side, bounded by [`MAX_DRAW_ATTEMPTS`].
    pub fn draw(&self, rng: &mut StdRng) -> Result<ParamDraw, MasweepError> {
        let mut values: Vec<f64> = self.params.iter().map(|(_, r)| r.draw(rng)).collect();

        for (fast, slow) in &self.constraints {
            let fast_idx = self
                .index_of(fast)
                .ok_or_else(|| MasweepError::UnknownParameter { name: fast.clone() })?;
            let slow_idx = self
                .index_of(slow)
                .ok_or_else(|| MasweepError::UnknownParameter { name: slow.clone() })?;

            let mut attempts = 0;
            while values[slow_idx] <= values[fast_idx] {
                attempts += 1;
                if attempts > MAX_DRAW_ATTEMPTS {
                    return Err(MasweepError::UnsatisfiableConstraint {
                        fast: fast.clone(),
                        slow: slow.clone(),
                        attempts: MAX_DRAW_ATTEMPTS,
                    });
                }
                values[slow_idx] = self.params[slow_idx].1.draw(rng);
            }
        }

        Ok(ParamDraw {
            values: self
                .params
                .iter()
                .zip(values)
                .map(|((name, _), value)| (name.clone(), value))
                .collect(),
        })
    }
}

/// One drawn parameter set, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDraw {
    values: Vec<(String, f64)>,
}

impl ParamDraw {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Integer-valued parameter (a period). None if absent or non-positive.
    pub fn get_period(&self, name: &str) -> Option<usize> {
        let value = self.get(name)?;
        if value >= 1.0 { Some(value as usize) } else { None }
    }

    pub fn values(&self) -> &[(String, f64)] {
        &self.values
    }

    /// Values rounded to two decimals for tabular display.
    pub fn rounded(&self) -> Vec<(String, f64)> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), (value * 100.0).round() / 100.0))
            .collect()
    }
}

/// One sweep row: drawn parameters (display-rounded) joined with the
/// trial's performance record.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityRun {
    pub params: Vec<(String, f64)>,
    pub record: PerformanceRecord,
}

impl SensitivityRun {
    pub fn param(&self, name: &str) -> Option<f64> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

// splitmix64 finalizer; decorrelates consecutive trial indices.
fn trial_seed(master: u64, trial: u64) -> u64 {
    let mut z = master ^ trial.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Run `trials` independent randomized trials of `build` over `space`.
///
/// Draw-time failures (unsatisfiable constraints, unknown names) abort the
/// sweep: every trial would fail the same way. A trial whose strategy
/// construction or simulation fails is excluded from the result set without
/// aborting the batch. `trials == 0` yields an empty collection.
pub fn run_sensitivity<S, F>(
    bars: &[OhlcvBar],
    space: &ParamSpace,
    trials: usize,
    master_seed: u64,
    build: F,
) -> Result<Vec<SensitivityRun>, MasweepError>
where
    S: Strategy,
    F: Fn(&ParamDraw) -> Result<S, MasweepError> + Sync,
{
    space.validate()?;

    let outcomes: Vec<Result<Option<SensitivityRun>, MasweepError>> = (0..trials)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(trial_seed(master_seed, trial as u64));
            let draw = space.draw(&mut rng)?;

            let run = build(&draw)
                .and_then(|strategy| {
                    // Each trial prepares its own copy of the series.
                    let series = PreparedSeries::prepare(bars, &strategy.required_periods());
                    simulate(&strategy, &series)
                })
                .map(|trajectory| SensitivityRun {
                    params: draw.rounded(),
                    record: PerformanceRecord::compute(&trajectory),
                })
                .ok();

            Ok(run)
        })
        .collect();

    let mut runs = Vec::with_capacity(trials);
    for outcome in outcomes {
        if let Some(run) = outcome? {
            runs.push(run);
        }
    }
    Ok(runs)
}

/// Final-equity tercile label for grouped sweep summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquityTercile {
    Low,
    Mid,
    High,
}

impl EquityTercile {
    pub fn label(self) -> &'static str {
        match self {
            EquityTercile::Low => "low",
            EquityTercile::Mid => "mid",
            EquityTercile::High => "high",
        }
    }
}

/// Per-tercile aggregate over a sweep's result set.
#[derive(Debug, Clone, PartialEq)]
pub struct TercileSummary {
    pub tercile: EquityTercile,
    pub runs: usize,
    /// Median of each drawn parameter within the tercile, in parameter order.
    pub param_medians: Vec<(String, f64)>,
}

/// Partition runs into equal-count final-equity terciles and report the
/// per-group median of every drawn parameter. Returns the groups in
/// low/mid/high order; groups a small result set leaves empty are omitted.
pub fn tercile_summary(runs: &[SensitivityRun]) -> Vec<TercileSummary> {
    if runs.is_empty() {
        return vec![];
    }

    let mut order: Vec<usize> = (0..runs.len()).collect();
    order.sort_by(|&a, &b| {
        runs[a]
            .record
            .final_equity
            .partial_cmp(&runs[b].record.final_equity)
            .unwrap_or(Ordering::Equal)
    });

    let terciles = [EquityTercile::Low, EquityTercile::Mid, EquityTercile::High];
    let param_names: Vec<&str> = runs[0].params.iter().map(|(n, _)| n.as_str()).collect();

    let mut summaries = Vec::new();
    for (group, &tercile) in terciles.iter().enumerate() {
        let members: Vec<usize> = order
            .iter()
            .enumerate()
            .filter(|(rank, _)| rank * 3 / runs.len() == group)
            .map(|(_, &idx)| idx)
            .collect();
        if members.is_empty() {
            continue;
        }

        let param_medians = param_names
            .iter()
            .map(|&name| {
                let mut values: Vec<f64> = members
                    .iter()
                    .filter_map(|&idx| runs[idx].param(name))
                    .collect();
                (name.to_string(), median(&mut values))
            })
            .collect();

        summaries.push(TercileSummary {
            tercile,
            runs: members.len(),
            param_medians,
        });
    }
    summaries
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
