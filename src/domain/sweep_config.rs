//! Sweep plan construction from a configuration source.
//!
//! Reads and validates the `[sweep]` and `[ranges]` sections of an INI
//! config into a [`SweepPlan`]; every bad value becomes a ConfigInvalid
//! error before any trial runs.

use crate::domain::error::MasweepError;
use crate::domain::sensitivity::{ParamDraw, ParamRange, ParamSpace};
use crate::domain::strategy::{MaCross, Strategy, TripleMa};
use crate::ports::config_port::ConfigPort;

/// Strategy variants addressable from config and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    TripleMa,
    MaCross,
}

impl StrategyKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "triple-ma" => Some(StrategyKind::TripleMa),
            "ma-cross" => Some(StrategyKind::MaCross),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::TripleMa => "triple-ma",
            StrategyKind::MaCross => "ma-cross",
        }
    }

    /// Parameter names drawn for this variant, in declaration order.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            StrategyKind::TripleMa => &["short", "medium", "long"],
            StrategyKind::MaCross => &["short", "long"],
        }
    }
}

/// A validated sweep: which strategy, how many trials, the seed, and the
/// parameter space to draw from.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub strategy: StrategyKind,
    pub trials: usize,
    pub seed: u64,
    pub space: ParamSpace,
}

const DEFAULT_TRIALS: i64 = 100;
const DEFAULT_SEED: i64 = 42;

/// Default period ranges per parameter; overridable via `[ranges]`
/// `{name}_min` / `{name}_max` keys.
fn default_range(name: &str) -> (i64, i64) {
    match name {
        "short" => (2, 8),
        "medium" => (5, 15),
        _ => (10, 40),
    }
}

pub fn build_sweep_plan(config: &dyn ConfigPort) -> Result<SweepPlan, MasweepError> {
    let name =
        config
            .get_string("sweep", "strategy")
            .ok_or_else(|| MasweepError::ConfigMissing {
                section: "sweep".into(),
                key: "strategy".into(),
            })?;
    let strategy = StrategyKind::parse(&name).ok_or_else(|| MasweepError::ConfigInvalid {
        section: "sweep".into(),
        key: "strategy".into(),
        reason: format!("unknown strategy {name:?}; expected triple-ma or ma-cross"),
    })?;

    let trials = config.get_int("sweep", "trials", DEFAULT_TRIALS);
    if trials < 0 {
        return Err(MasweepError::ConfigInvalid {
            section: "sweep".into(),
            key: "trials".into(),
            reason: "must be non-negative".into(),
        });
    }

    let seed = config.get_int("sweep", "seed", DEFAULT_SEED);
    if seed < 0 {
        return Err(MasweepError::ConfigInvalid {
            section: "sweep".into(),
            key: "seed".into(),
            reason: "must be non-negative".into(),
        });
    }

    let mut space = ParamSpace::new();
    for &param in strategy.param_names() {
        let (default_min, default_max) = default_range(param);
        let min = config.get_int("ranges", &format!("{param}_min"), default_min);
        let max = config.get_int("ranges", &format!("{param}_max"), default_max);
        if min < 1 {
            return Err(MasweepError::ConfigInvalid {
                section: "ranges".into(),
                key: format!("{param}_min"),
                reason: "periods must be at least 1".into(),
            });
        }
        if min > max {
            return Err(MasweepError::ConfigInvalid {
                section: "ranges".into(),
                key: format!("{param}_max"),
                reason: format!("must be >= {param}_min"),
            });
        }
        space = space.with_param(param, ParamRange::Int(min, max));
    }

    // Slow periods must be drawn strictly above their faster neighbors.
    let names = strategy.param_names();
    for pair in names.windows(2) {
        space = space.with_constraint(pair[0], pair[1]);
    }

    Ok(SweepPlan {
        strategy,
        trials: trials as usize,
        seed: seed as u64,
        space,
    })
}

/// Construct the strategy a drawn parameter set describes.
pub fn build_strategy(
    kind: StrategyKind,
    draw: &ParamDraw,
) -> Result<Box<dyn Strategy>, MasweepError> {
    let period = |name: &str| {
        draw.get_period(name)
            .ok_or_else(|| MasweepError::StrategyInvalid {
                reason: format!("drawn parameter {name} is missing or non-positive"),
            })
    };
    match kind {
        StrategyKind::TripleMa => {
            let strategy = TripleMa::new(period("short")?, period("medium")?, period("long")?)?;
            Ok(Box::new(strategy))
        }
        StrategyKind::MaCross => {
            let strategy = MaCross::new(period("short")?, period("long")?)?;
            Ok(Box::new(strategy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn strategy_kind_round_trips() {
        for kind in [StrategyKind::TripleMa, StrategyKind::MaCross] {
            assert_eq!(StrategyKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(StrategyKind::parse("martingale"), None);
    }

    #[test]
    fn plan_from_minimal_config_uses_defaults() {
        let plan = build_sweep_plan(&config("[sweep]\nstrategy = ma-cross\n")).unwrap();
        assert_eq!(plan.strategy, StrategyKind::MaCross);
        assert_eq!(plan.trials, 100);
        assert_eq!(plan.seed, 42);
        assert_eq!(plan.space.names(), vec!["short", "long"]);
    }

    #[test]
    fn plan_reads_trials_seed_and_ranges() {
        let plan = build_sweep_plan(&config(
            "[sweep]\nstrategy = triple-ma\ntrials = 250\nseed = 7\n\
             [ranges]\nshort_min = 3\nshort_max = 6\nmedium_min = 5\nmedium_max = 12\n\
             long_min = 10\nlong_max = 30\n",
        ))
        .unwrap();
        assert_eq!(plan.strategy, StrategyKind::TripleMa);
        assert_eq!(plan.trials, 250);
        assert_eq!(plan.seed, 7);
        assert_eq!(plan.space.names(), vec!["short", "medium", "long"]);
    }

    #[test]
    fn missing_strategy_key() {
        let err = build_sweep_plan(&config("[sweep]\ntrials = 10\n")).unwrap_err();
        assert!(matches!(err, MasweepError::ConfigMissing { .. }));
    }

    #[test]
    fn unknown_strategy_name() {
        let err = build_sweep_plan(&config("[sweep]\nstrategy = martingale\n")).unwrap_err();
        assert!(matches!(err, MasweepError::ConfigInvalid { .. }));
    }

    #[test]
    fn negative_trials_rejected() {
        let err =
            build_sweep_plan(&config("[sweep]\nstrategy = ma-cross\ntrials = -5\n")).unwrap_err();
        assert!(matches!(err, MasweepError::ConfigInvalid { .. }));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = build_sweep_plan(&config(
            "[sweep]\nstrategy = ma-cross\n[ranges]\nshort_min = 9\nshort_max = 2\n",
        ))
        .unwrap_err();
        assert!(matches!(err, MasweepError::ConfigInvalid { .. }));
    }

    #[test]
    fn zero_period_range_rejected() {
        let err = build_sweep_plan(&config(
            "[sweep]\nstrategy = ma-cross\n[ranges]\nshort_min = 0\n",
        ))
        .unwrap_err();
        assert!(matches!(err, MasweepError::ConfigInvalid { .. }));
    }

    #[test]
    fn built_strategies_honor_drawn_constraints() {
        let plan = build_sweep_plan(&config("[sweep]\nstrategy = triple-ma\n")).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let draw = plan.space.draw(&mut rng).unwrap();
            let strategy = build_strategy(plan.strategy, &draw).unwrap();
            assert_eq!(strategy.name(), "triple-ma");
        }
    }

    #[test]
    fn build_strategy_missing_parameter() {
        let plan = build_sweep_plan(&config("[sweep]\nstrategy = ma-cross\n")).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let draw = plan.space.draw(&mut rng).unwrap();
        let err = build_strategy(StrategyKind::TripleMa, &draw).unwrap_err();
        assert!(matches!(err, MasweepError::StrategyInvalid { .. }));
    }
}
