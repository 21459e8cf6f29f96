//! Single backtest run: one window pair in, simulation and metrics out.

use crate::domain::error::MatraderError;
use crate::domain::metrics::Metrics;
use crate::domain::moving_average::calculate_sma;
use crate::domain::price::PriceSeries;
use crate::domain::signal::generate_signals;
use crate::domain::simulation::{simulate, Simulation};

#[derive(Debug, Clone, Copy)]
pub struct BacktestConfig {
    pub fast_window: usize,
    pub slow_window: usize,
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub fast_window: usize,
    pub slow_window: usize,
    pub simulation: Simulation,
    pub metrics: Metrics,
}

/// Run the full pipeline for one window pair: averages, signals, simulation,
/// metrics. The fast window must be strictly shorter than the slow one, and
/// the series must cover at least the slow window.
pub fn run_backtest(
    prices: &PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, MatraderError> {
    if config.fast_window >= config.slow_window {
        return Err(MatraderError::InvalidParameter {
            reason: format!(
                "fast window ({}) must be shorter than slow window ({})",
                config.fast_window, config.slow_window
            ),
        });
    }
    if prices.len() < config.slow_window {
        return Err(MatraderError::InsufficientData {
            ticker: prices.ticker().to_string(),
            have: prices.len(),
            need: config.slow_window,
        });
    }

    let fast = calculate_sma(prices, config.fast_window)?;
    let slow = calculate_sma(prices, config.slow_window)?;
    let signals = generate_signals(&fast, &slow)?;
    let simulation = simulate(prices, &signals)?;
    let metrics = Metrics::compute(
        &simulation.strategy_returns,
        &simulation.benchmark_returns,
        config.risk_free_rate,
        config.periods_per_year,
    )?;

    Ok(BacktestResult {
        fast_window: config.fast_window,
        slow_window: config.slow_window,
        simulation,
        metrics,
    })
}
