//! Window grid search: run every valid pair in parallel, keep the best
//! sharpe ratio.

use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::error::MatraderError;
use crate::domain::metrics::Metrics;
use crate::domain::price::PriceSeries;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct WindowGrid {
    pub fast_windows: Vec<usize>,
    pub slow_windows: Vec<usize>,
}

impl WindowGrid {
    pub fn candidates(&self) -> usize {
        self.fast_windows.len() * self.slow_windows.len()
    }

    /// All (fast, slow) combinations that can run against a series of `len`
    /// observations, sorted by fast window then slow window. A pair is valid
    /// when the fast window is at least 1, strictly shorter than the slow
    /// window, and the slow window fits the series.
    pub fn valid_pairs(&self, len: usize) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = self
            .fast_windows
            .iter()
            .flat_map(|&fast| self.slow_windows.iter().map(move |&slow| (fast, slow)))
            .filter(|&(fast, slow)| fast >= 1 && fast < slow && slow <= len)
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}

#[derive(Debug, Clone)]
pub struct PairResult {
    pub fast_window: usize,
    pub slow_window: usize,
    pub metrics: Metrics,
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// One entry per valid pair, in (fast, slow) order.
    pub results: Vec<PairResult>,
    pub best: PairResult,
}

/// Backtest every valid window pair and select the one with the highest
/// sharpe ratio. Pairs without a sharpe (flat volatility) rank below every
/// pair that has one; ties keep the smallest fast window, then the smallest
/// slow window. The pair runs are independent and execute on the rayon pool,
/// and the selection itself is a sequential fold so the outcome does not
/// depend on scheduling.
pub fn optimize(
    prices: &PriceSeries,
    grid: &WindowGrid,
    risk_free_rate: f64,
    periods_per_year: f64,
) -> Result<OptimizationResult, MatraderError> {
    let pairs = grid.valid_pairs(prices.len());
    if pairs.is_empty() {
        return Err(MatraderError::NoValidParameter {
            candidates: grid.candidates(),
            len: prices.len(),
        });
    }

    let results: Vec<PairResult> = pairs
        .par_iter()
        .map(|&(fast_window, slow_window)| {
            let config = BacktestConfig {
                fast_window,
                slow_window,
                risk_free_rate,
                periods_per_year,
            };
            run_backtest(prices, &config).map(|run| PairResult {
                fast_window,
                slow_window,
                metrics: run.metrics,
            })
        })
        .collect::<Result<Vec<_>, MatraderError>>()?;

    let mut best = results[0].clone();
    for candidate in &results[1..] {
        let best_sharpe = best.metrics.sharpe_ratio.unwrap_or(f64::NEG_INFINITY);
        let sharpe = candidate.metrics.sharpe_ratio.unwrap_or(f64::NEG_INFINITY);
        if sharpe > best_sharpe {
            best = candidate.clone();
        }
    }

    Ok(OptimizationResult { results, best })
}
