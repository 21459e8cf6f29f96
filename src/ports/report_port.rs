//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::MatraderError;
use crate::domain::optimizer::OptimizationResult;

/// Port for writing run reports.
pub trait ReportPort {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        ticker: &str,
        output_path: &str,
    ) -> Result<(), MatraderError>;

    fn write_optimization(
        &self,
        result: &OptimizationResult,
        ticker: &str,
        output_path: &str,
    ) -> Result<(), MatraderError>;
}
