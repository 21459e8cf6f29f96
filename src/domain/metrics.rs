//! Performance metrics and statistics.

use crate::domain::error::MatraderError;
use crate::domain::simulation::ReturnPoint;

pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;

/// Risk and performance summary of one simulation run.
///
/// `sharpe_ratio`, `alpha`, `beta`, and `calmar_ratio` are `None` when their
/// denominator degenerates (zero volatility, zero benchmark variance, zero
/// drawdown): a "no signal" sentinel rather than a division by zero. The
/// remaining fields are always defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub max_drawdown: f64,
    pub calmar_ratio: Option<f64>,
}

impl Metrics {
    /// Compute all metrics from aligned strategy and benchmark returns.
    ///
    /// `risk_free_rate` is an annual rate and is scaled down to one period
    /// before entering the sharpe numerator. Statistics use sample
    /// denominators (n − 1). Pure function of its inputs.
    pub fn compute(
        strategy: &[ReturnPoint],
        benchmark: &[ReturnPoint],
        risk_free_rate: f64,
        periods_per_year: f64,
    ) -> Result<Self, MatraderError> {
        if strategy.len() != benchmark.len() {
            return Err(MatraderError::MisalignedSeries {
                reason: format!(
                    "strategy has {} returns, benchmark has {}",
                    strategy.len(),
                    benchmark.len()
                ),
            });
        }

        let strategy_values: Vec<f64> = strategy.iter().map(|r| r.value).collect();
        let benchmark_values: Vec<f64> = benchmark.iter().map(|r| r.value).collect();

        let (total_return, max_drawdown) = compute_equity_stats(&strategy_values);

        let strategy_mean = mean(&strategy_values);
        let strategy_stddev = sample_stddev(&strategy_values);
        let annualized_volatility = strategy_stddev * periods_per_year.sqrt();

        let periodic_rf = risk_free_rate / periods_per_year;
        let sharpe_ratio = if strategy_stddev > 0.0 {
            Some((strategy_mean - periodic_rf) / strategy_stddev * periods_per_year.sqrt())
        } else {
            None
        };

        let benchmark_variance = sample_variance(&benchmark_values);
        let beta = if benchmark_variance > 0.0 {
            Some(sample_covariance(&strategy_values, &benchmark_values) / benchmark_variance)
        } else {
            None
        };

        let alpha =
            beta.map(|b| (strategy_mean - b * mean(&benchmark_values)) * periods_per_year);

        let calmar_ratio = if max_drawdown < 0.0 {
            Some(strategy_mean * periods_per_year / max_drawdown.abs())
        } else {
            None
        };

        Ok(Metrics {
            total_return,
            annualized_volatility,
            sharpe_ratio,
            alpha,
            beta,
            max_drawdown,
            calmar_ratio,
        })
    }
}

/// Final equity minus one, and the deepest decline from a running peak, for
/// the equity curve implied by the returns (cumulative product from 1.0).
/// The drawdown is ≤ 0 and equals 0 only when equity never dips.
fn compute_equity_stats(returns: &[f64]) -> (f64, f64) {
    let mut equity = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut max_drawdown = 0.0_f64;

    for r in returns {
        equity *= 1.0 + r;
        if equity > peak {
            peak = equity;
        }
        let drawdown = equity / peak - 1.0;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
    }

    (equity - 1.0, max_drawdown)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

fn sample_stddev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 {
        return 0.0;
    }
    let mean_a = mean(a);
    let mean_b = mean(b);
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / (a.len() - 1) as f64
}
