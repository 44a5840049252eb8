//! CLI definition and dispatch.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::MasweepError;
use crate::domain::indicator::PreparedSeries;
use crate::domain::metrics::PerformanceRecord;
use crate::domain::sensitivity::{run_sensitivity, tercile_summary, SensitivityRun};
use crate::domain::simulate::simulate;
use crate::domain::strategy::{MaCross, Strategy, TripleMa};
use crate::domain::sweep_config::{build_strategy, build_sweep_plan, StrategyKind};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "masweep",
    about = "Moving-average strategy backtester and parameter sensitivity sweeper"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest one strategy over a CSV price series and print its metrics
    Backtest {
        /// CSV file with date,open,high,low,close,volume rows
        #[arg(short, long)]
        data: PathBuf,
        /// Strategy variant: triple-ma or ma-cross
        #[arg(short, long)]
        strategy: String,
        /// Comma-separated periods, fast to slow (3 for triple-ma, 2 for ma-cross)
        #[arg(short, long, value_delimiter = ',')]
        periods: Vec<usize>,
    },
    /// Run the randomized parameter sweep described by an INI config
    Sweep {
        #[arg(short, long)]
        config: PathBuf,
        /// CSV file with date,open,high,low,close,volume rows
        #[arg(short, long)]
        data: PathBuf,
        /// Optional CSV path for the full result table
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a sweep config and exit
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            data,
            strategy,
            periods,
        } => run_backtest(&data, &strategy, &periods),
        Command::Sweep {
            config,
            data,
            output,
        } => run_sweep(&config, &data, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }
    }
}

/// Resolve a CLI strategy name and period list into a strategy value.
pub fn parse_strategy(name: &str, periods: &[usize]) -> Result<Box<dyn Strategy>, MasweepError> {
    let kind = StrategyKind::parse(name).ok_or_else(|| MasweepError::StrategyInvalid {
        reason: format!("unknown strategy {name:?}; expected triple-ma or ma-cross"),
    })?;
    match (kind, periods) {
        (StrategyKind::TripleMa, &[short, medium, long]) => {
            Ok(Box::new(TripleMa::new(short, medium, long)?))
        }
        (StrategyKind::MaCross, &[short, long]) => Ok(Box::new(MaCross::new(short, long)?)),
        (kind, _) => Err(MasweepError::StrategyInvalid {
            reason: format!(
                "{} takes {} periods, got {}",
                kind.as_str(),
                kind.param_names().len(),
                periods.len()
            ),
        }),
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, MasweepError> {
    FileConfigAdapter::from_file(path).map_err(|e| MasweepError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn run_backtest(data: &Path, strategy_name: &str, periods: &[usize]) -> Result<(), MasweepError> {
    let strategy = parse_strategy(strategy_name, periods)?;
    let bars = CsvAdapter.load_series(&data.display().to_string())?;

    let series = PreparedSeries::prepare(&bars, &strategy.required_periods());
    let trajectory = simulate(&strategy, &series)?;
    let record = PerformanceRecord::compute(&trajectory);

    println!("strategy:  {}", strategy.name());
    println!("bars:      {}", bars.len());
    println!(
        "buy-hold:  {:.2}",
        trajectory.buy_hold.last().copied().unwrap_or(0.0)
    );
    for (name, value) in PerformanceRecord::FIELD_NAMES
        .iter()
        .zip(record.field_values())
    {
        println!("{name}: {value:.4}");
    }
    Ok(())
}

fn run_sweep(config: &Path, data: &Path, output: Option<&Path>) -> Result<(), MasweepError> {
    let adapter = load_config(config)?;
    let plan = build_sweep_plan(&adapter)?;
    let bars = CsvAdapter.load_series(&data.display().to_string())?;

    let kind = plan.strategy;
    let runs = run_sensitivity(&bars, &plan.space, plan.trials, plan.seed, |draw| {
        build_strategy(kind, draw)
    })?;

    println!(
        "{} sweep: {} of {} trials produced results",
        plan.strategy.as_str(),
        runs.len(),
        plan.trials
    );
    print_summary(&runs);

    if let Some(path) = output {
        CsvReportAdapter.write_runs(&runs, &path.display().to_string())?;
        println!("wrote {} rows to {}", runs.len(), path.display());
    }
    Ok(())
}

fn print_summary(runs: &[SensitivityRun]) {
    for group in tercile_summary(runs) {
        let medians: Vec<String> = group
            .param_medians
            .iter()
            .map(|(name, value)| format!("{name}={value:.2}"))
            .collect();
        println!(
            "{:>5} equity tercile ({} runs): median {}",
            group.tercile.label(),
            group.runs,
            medians.join(", ")
        );
    }
}

fn run_validate(config: &Path) -> Result<(), MasweepError> {
    let adapter = load_config(config)?;
    let plan = build_sweep_plan(&adapter)?;
    plan.space.validate()?;
    println!(
        "ok: {} sweep, {} trials, seed {}, parameters {}",
        plan.strategy.as_str(),
        plan.trials,
        plan.seed,
        plan.space.names().join(", ")
    );
    Ok(())
}
