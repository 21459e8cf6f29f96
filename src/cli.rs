//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::config_validation::{
    resolve_mode, validate_data_config, validate_optimize_config, validate_strategy_config,
    RunMode,
};
use crate::domain::error::MatraderError;
use crate::domain::metrics::{Metrics, DEFAULT_PERIODS_PER_YEAR};
use crate::domain::optimizer::{optimize, WindowGrid};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "matrader", about = "Moving-average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the strategy for one ticker
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(long)]
        fast: Option<usize>,
        #[arg(long)]
        slow: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for ticker(s)
    Info {
        #[arg(short, long)]
        ticker: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            ticker,
            fast,
            slow,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, ticker.as_deref())
            } else {
                run_strategy(&config, ticker.as_deref(), fast, slow, output.as_ref())
            }
        }
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Info { ticker, config } => run_info(ticker.as_deref(), &config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = MatraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_strategy(
    config_path: &PathBuf,
    ticker_override: Option<&str>,
    fast_override: Option<usize>,
    slow_override: Option<usize>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate config
    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let mode = match resolve_mode(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if mode == RunMode::Optimize {
        if let Err(e) = validate_optimize_config(&adapter) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    // Stage 3: Resolve ticker and date range
    let ticker = match resolve_ticker(ticker_override, &adapter) {
        Some(t) => t,
        None => {
            eprintln!("error: no ticker configured (use --ticker or set [strategy] ticker)");
            return ExitCode::from(2);
        }
    };

    let (start_date, end_date) = match build_date_range(&adapter) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Build data adapter
    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match mode {
        RunMode::Single => {
            let bt_config = build_backtest_config(&adapter, fast_override, slow_override);
            run_single_pipeline(
                &data_port,
                &ticker,
                start_date,
                end_date,
                &bt_config,
                output_path,
            )
        }
        RunMode::Optimize => {
            let grid = build_window_grid(&adapter);
            let risk_free_rate = adapter.get_double("strategy", "risk_free_rate", 0.0);
            let periods_per_year =
                adapter.get_double("strategy", "periods_per_year", DEFAULT_PERIODS_PER_YEAR);
            run_optimize_pipeline(
                &data_port,
                &ticker,
                start_date,
                end_date,
                &grid,
                risk_free_rate,
                periods_per_year,
                output_path,
            )
        }
    }
}

pub fn resolve_ticker(ticker_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    if let Some(t) = ticker_override {
        let t = t.trim().to_uppercase();
        if !t.is_empty() {
            return Some(t);
        }
    }

    if let Some(t) = config.get_string("strategy", "ticker") {
        let t = t.trim().to_uppercase();
        if !t.is_empty() {
            return Some(t);
        }
    }

    None
}

pub fn build_date_range(
    adapter: &dyn ConfigPort,
) -> Result<(NaiveDate, NaiveDate), MatraderError> {
    let start_str =
        adapter
            .get_string("data", "start_date")
            .ok_or_else(|| MatraderError::ConfigMissing {
                section: "data".into(),
                key: "start_date".into(),
            })?;
    let end_str =
        adapter
            .get_string("data", "end_date")
            .ok_or_else(|| MatraderError::ConfigMissing {
                section: "data".into(),
                key: "end_date".into(),
            })?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        MatraderError::ConfigInvalid {
            section: "data".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;
    let end_date = NaiveDate::parse_from_str(&end_str, "%Y-%m-%d").map_err(|_| {
        MatraderError::ConfigInvalid {
            section: "data".into(),
            key: "end_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    Ok((start_date, end_date))
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    fast_override: Option<usize>,
    slow_override: Option<usize>,
) -> BacktestConfig {
    let fast_window = fast_override
        .unwrap_or_else(|| adapter.get_int("strategy", "fast_window", 50).max(0) as usize);
    let slow_window = slow_override
        .unwrap_or_else(|| adapter.get_int("strategy", "slow_window", 200).max(0) as usize);

    BacktestConfig {
        fast_window,
        slow_window,
        risk_free_rate: adapter.get_double("strategy", "risk_free_rate", 0.0),
        periods_per_year: adapter.get_double(
            "strategy",
            "periods_per_year",
            DEFAULT_PERIODS_PER_YEAR,
        ),
    }
}

pub fn build_window_grid(adapter: &dyn ConfigPort) -> WindowGrid {
    WindowGrid {
        fast_windows: window_range(adapter, "fast_start", "fast_stop", "fast_step", 10, 60, 5),
        slow_windows: window_range(
            adapter,
            "slow_start",
            "slow_stop",
            "slow_step",
            100,
            250,
            10,
        ),
    }
}

fn window_range(
    adapter: &dyn ConfigPort,
    start_key: &str,
    stop_key: &str,
    step_key: &str,
    default_start: i64,
    default_stop: i64,
    default_step: i64,
) -> Vec<usize> {
    let start = adapter.get_int("optimize", start_key, default_start).max(1);
    let stop = adapter.get_int("optimize", stop_key, default_stop).max(start);
    let step = adapter.get_int("optimize", step_key, default_step).max(1);

    (start..=stop)
        .step_by(step as usize)
        .map(|w| w as usize)
        .collect()
}

fn build_data_port(adapter: &dyn ConfigPort) -> Result<CsvAdapter, MatraderError> {
    let path = adapter
        .get_string("data", "path")
        .ok_or_else(|| MatraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

fn print_metrics_summary(metrics: &Metrics) {
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!(
        "Ann. Volatility:  {:.2}%",
        metrics.annualized_volatility * 100.0
    );
    eprintln!("Sharpe Ratio:     {}", format_metric(metrics.sharpe_ratio));
    eprintln!("Alpha:            {}", format_metric(metrics.alpha));
    eprintln!("Beta:             {}", format_metric(metrics.beta));
    eprintln!("Max Drawdown:     {:.2}%", metrics.max_drawdown * 100.0);
    eprintln!("Calmar Ratio:     {}", format_metric(metrics.calmar_ratio));
}

pub fn run_single_pipeline(
    data_port: &dyn DataPort,
    ticker: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    bt_config: &BacktestConfig,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 5: Fetch prices
    eprintln!("Fetching {} from {} to {}...", ticker, start_date, end_date);
    let prices = match data_port.fetch_prices(ticker, start_date, end_date) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} observations", prices.len());

    // Stage 6: Run the pipeline
    eprintln!(
        "Running backtest: fast={}, slow={}",
        bt_config.fast_window, bt_config.slow_window
    );
    let result = match run_backtest(&prices, bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 7: Print console summary to stderr
    let benchmark_return = result
        .simulation
        .benchmark_equity
        .last()
        .map(|p| p.equity - 1.0)
        .unwrap_or(0.0);

    eprintln!("\n=== Backtest Results ===");
    print_metrics_summary(&result.metrics);
    eprintln!("Trades:           {}", result.simulation.trades.len());
    eprintln!("Benchmark Return: {:.2}%", benchmark_return * 100.0);

    // Stage 8: Write report
    if let Some(output) = output_path {
        let reporter = TextReportAdapter::new();
        match reporter.write_backtest(&result, ticker, &output.display().to_string()) {
            Ok(()) => eprintln!("\nReport written to: {}", output.display()),
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                return ExitCode::from(1);
            }
        }
    }

    ExitCode::SUCCESS
}

#[allow(clippy::too_many_arguments)]
pub fn run_optimize_pipeline(
    data_port: &dyn DataPort,
    ticker: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    grid: &WindowGrid,
    risk_free_rate: f64,
    periods_per_year: f64,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 5: Fetch prices
    eprintln!("Fetching {} from {} to {}...", ticker, start_date, end_date);
    let prices = match data_port.fetch_prices(ticker, start_date, end_date) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("  {} observations", prices.len());

    // Stage 6: Grid search
    eprintln!(
        "Optimizing over {} candidate pairs ({} fast x {} slow)...",
        grid.candidates(),
        grid.fast_windows.len(),
        grid.slow_windows.len()
    );
    let result = match optimize(&prices, grid, risk_free_rate, periods_per_year) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 7: Print console summary to stderr
    eprintln!("\n=== Optimization Results ===");
    eprintln!("Pairs evaluated:  {}", result.results.len());
    eprintln!(
        "Best pair:        fast={}, slow={}",
        result.best.fast_window, result.best.slow_window
    );
    print_metrics_summary(&result.best.metrics);

    // Stage 8: Write report
    if let Some(output) = output_path {
        let reporter = TextReportAdapter::new();
        match reporter.write_optimization(&result, ticker, &output.display().to_string()) {
            Ok(()) => eprintln!("\nReport written to: {}", output.display()),
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                return ExitCode::from(1);
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &PathBuf, ticker_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_data_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let mode = match resolve_mode(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if mode == RunMode::Optimize {
        if let Err(e) = validate_optimize_config(&adapter) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }
    eprintln!("Config validated successfully");

    let ticker = match resolve_ticker(ticker_override, &adapter) {
        Some(t) => t,
        None => {
            eprintln!("error: no ticker configured (use --ticker or set [strategy] ticker)");
            return ExitCode::from(2);
        }
    };

    let (start_date, end_date) = match build_date_range(&adapter) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nPlan:");
    eprintln!("  ticker: {}", ticker);
    eprintln!("  range:  {} to {}", start_date, end_date);

    match mode {
        RunMode::Single => {
            let config = build_backtest_config(&adapter, None, None);
            eprintln!("  mode:   single");
            eprintln!(
                "  windows: fast={}, slow={}",
                config.fast_window, config.slow_window
            );
        }
        RunMode::Optimize => {
            let grid = build_window_grid(&adapter);
            eprintln!("  mode:   optimize");
            eprintln!(
                "  grid:   {} fast x {} slow = {} candidates",
                grid.fast_windows.len(),
                grid.slow_windows.len(),
                grid.candidates()
            );
        }
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers = match data_port.list_tickers() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if tickers.is_empty() {
        eprintln!("No tickers found");
    } else {
        for ticker in &tickers {
            println!("{}", ticker);
        }
        eprintln!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}

fn run_info(ticker: Option<&str>, config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tickers: Vec<String> = match resolve_ticker(ticker, &config) {
        Some(t) => vec![t],
        None => match data_port.list_tickers() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    if tickers.is_empty() {
        eprintln!("No tickers found");
        return ExitCode::SUCCESS;
    }

    for t in &tickers {
        match data_port.get_data_range(t) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} observations, {} to {}", t, count, first, last);
            }
            Ok(None) => {
                eprintln!("{}: no data found", t);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", t, e);
            }
        }
    }
    ExitCode::SUCCESS
}
