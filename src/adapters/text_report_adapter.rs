//! Plain-text report adapter implementing ReportPort.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MatraderError;
use crate::domain::metrics::Metrics;
use crate::domain::optimizer::OptimizationResult;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "n/a".to_string(),
    }
}

fn render_metrics(out: &mut String, metrics: &Metrics) {
    let _ = writeln!(out, "Total Return:          {:.2}%", metrics.total_return * 100.0);
    let _ = writeln!(
        out,
        "Annualized Volatility: {:.2}%",
        metrics.annualized_volatility * 100.0
    );
    let _ = writeln!(out, "Sharpe Ratio:          {}", fmt_metric(metrics.sharpe_ratio));
    let _ = writeln!(out, "Alpha:                 {}", fmt_metric(metrics.alpha));
    let _ = writeln!(out, "Beta:                  {}", fmt_metric(metrics.beta));
    let _ = writeln!(out, "Max Drawdown:          {:.2}%", metrics.max_drawdown * 100.0);
    let _ = writeln!(out, "Calmar Ratio:          {}", fmt_metric(metrics.calmar_ratio));
}

fn write_report(content: &str, output_path: &str) -> Result<(), MatraderError> {
    let path = Path::new(output_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(MatraderError::Io)?;
    }
    fs::write(path, content).map_err(MatraderError::Io)?;
    Ok(())
}

impl ReportPort for TextReportAdapter {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        ticker: &str,
        output_path: &str,
    ) -> Result<(), MatraderError> {
        let mut out = String::new();

        let _ = writeln!(out, "Backtest Report: {}", ticker);
        let _ = writeln!(
            out,
            "Windows: fast={}, slow={}",
            result.fast_window, result.slow_window
        );
        if let (Some(first), Some(last)) = (
            result.simulation.strategy_equity.first(),
            result.simulation.strategy_equity.last(),
        ) {
            let _ = writeln!(out, "Period: {} to {}", first.date, last.date);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "=== Metrics ===");
        render_metrics(&mut out, &result.metrics);

        let benchmark_return = result
            .simulation
            .benchmark_equity
            .last()
            .map(|p| p.equity - 1.0)
            .unwrap_or(0.0);
        let _ = writeln!(out, "Benchmark Return:      {:.2}%", benchmark_return * 100.0);
        let _ = writeln!(out);

        let _ = writeln!(out, "=== Trades ({}) ===", result.simulation.trades.len());
        for trade in &result.simulation.trades {
            match (trade.exit_date, trade.exit_price, trade.return_pct()) {
                (Some(exit_date), Some(exit_price), Some(ret)) => {
                    let _ = writeln!(
                        out,
                        "  {} @ {:.2} -> {} @ {:.2}  ({:+.2}%)",
                        trade.entry_date,
                        trade.entry_price,
                        exit_date,
                        exit_price,
                        ret * 100.0
                    );
                }
                _ => {
                    let _ = writeln!(
                        out,
                        "  {} @ {:.2} -> open",
                        trade.entry_date, trade.entry_price
                    );
                }
            }
        }

        write_report(&out, output_path)
    }

    fn write_optimization(
        &self,
        result: &OptimizationResult,
        ticker: &str,
        output_path: &str,
    ) -> Result<(), MatraderError> {
        let mut out = String::new();

        let _ = writeln!(out, "Optimization Report: {}", ticker);
        let _ = writeln!(out, "Pairs evaluated: {}", result.results.len());
        let _ = writeln!(
            out,
            "Best pair: fast={}, slow={}",
            result.best.fast_window, result.best.slow_window
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "=== Best Pair Metrics ===");
        render_metrics(&mut out, &result.best.metrics);
        let _ = writeln!(out);

        let _ = writeln!(out, "=== All Pairs (by sharpe) ===");
        let _ = writeln!(out, "  fast  slow  sharpe      total_return");

        // Sentinel sharpe sorts last; equal sharpe keeps (fast, slow) order.
        let mut ranked: Vec<_> = result.results.iter().collect();
        ranked.sort_by(|a, b| {
            let sa = a.metrics.sharpe_ratio.unwrap_or(f64::NEG_INFINITY);
            let sb = b.metrics.sharpe_ratio.unwrap_or(f64::NEG_INFINITY);
            sb.partial_cmp(&sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.fast_window, a.slow_window).cmp(&(b.fast_window, b.slow_window)))
        });

        for entry in ranked {
            let _ = writeln!(
                out,
                "  {:<5} {:<5} {:<11} {:.2}%",
                entry.fast_window,
                entry.slow_window,
                fmt_metric(entry.metrics.sharpe_ratio),
                entry.metrics.total_return * 100.0
            );
        }

        write_report(&out, output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{run_backtest, BacktestConfig};
    use crate::domain::metrics::DEFAULT_PERIODS_PER_YEAR;
    use crate::domain::optimizer::{optimize, WindowGrid};
    use crate::domain::price::{PricePoint, PriceSeries};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn make_prices(count: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let points = (0..count)
            .map(|i| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close: 100.0 + 10.0 * (i as f64 * 0.5).sin() + i as f64 * 0.2,
            })
            .collect();
        PriceSeries::new("BHP".to_string(), points).unwrap()
    }

    fn sample_backtest() -> crate::domain::backtest::BacktestResult {
        let config = BacktestConfig {
            fast_window: 2,
            slow_window: 5,
            risk_free_rate: 0.0,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        };
        run_backtest(&make_prices(40), &config).unwrap()
    }

    #[test]
    fn write_backtest_creates_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("report.txt");

        let adapter = TextReportAdapter::new();
        adapter
            .write_backtest(&sample_backtest(), "BHP", output.to_str().unwrap())
            .unwrap();

        assert!(output.exists());
        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.contains("Backtest Report: BHP"));
        assert!(contents.contains("fast=2, slow=5"));
        assert!(contents.contains("Total Return"));
        assert!(contents.contains("Sharpe Ratio"));
        assert!(contents.contains("Max Drawdown"));
        assert!(contents.contains("=== Trades"));
    }

    #[test]
    fn write_backtest_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested/deep/report.txt");

        let adapter = TextReportAdapter::new();
        adapter
            .write_backtest(&sample_backtest(), "BHP", output.to_str().unwrap())
            .unwrap();

        assert!(output.exists());
    }

    #[test]
    fn write_backtest_marks_open_trade() {
        // Rising prices keep the last position open through series end.
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let points = (0..20)
            .map(|i| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close: 100.0 + i as f64,
            })
            .collect();
        let prices = PriceSeries::new("BHP".to_string(), points).unwrap();
        let config = BacktestConfig {
            fast_window: 2,
            slow_window: 4,
            risk_free_rate: 0.0,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        };
        let result = run_backtest(&prices, &config).unwrap();
        assert!(result.simulation.trades.last().unwrap().is_open());

        let dir = tempdir().unwrap();
        let output = dir.path().join("report.txt");
        TextReportAdapter::new()
            .write_backtest(&result, "BHP", output.to_str().unwrap())
            .unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.contains("-> open"));
    }

    #[test]
    fn write_optimization_lists_best_pair() {
        let prices = make_prices(40);
        let grid = WindowGrid {
            fast_windows: vec![2, 3],
            slow_windows: vec![5, 8],
        };
        let result = optimize(&prices, &grid, 0.0, DEFAULT_PERIODS_PER_YEAR).unwrap();

        let dir = tempdir().unwrap();
        let output = dir.path().join("opt.txt");
        TextReportAdapter::new()
            .write_optimization(&result, "BHP", output.to_str().unwrap())
            .unwrap();

        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.contains("Optimization Report: BHP"));
        assert!(contents.contains(&format!(
            "Best pair: fast={}, slow={}",
            result.best.fast_window, result.best.slow_window
        )));
        assert!(contents.contains("=== All Pairs"));
        assert!(contents.contains("Pairs evaluated: 4"));
    }
}
