//! Trade simulation: position signal + prices → returns and equity curves.
//!
//! Exposure over a period is set by the position held at the start of the
//! period, so a signal computed from price(t+1) never decides the return
//! earned during the period ending at t+1.

use crate::domain::error::MatraderError;
use crate::domain::price::PriceSeries;
use crate::domain::signal::{Position, SignalPoint};
use chrono::NaiveDate;

/// One period-over-period percentage return, stamped with the period end.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One point of a cumulative equity curve.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// A round trip inferred from consecutive signal values: entry on FLAT→LONG,
/// exit on LONG→FLAT. A position still open at the end of the series keeps
/// `None` exit fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.exit_date.is_none()
    }

    /// Realized return of a closed trade, `None` while open.
    pub fn return_pct(&self) -> Option<f64> {
        match self.exit_price {
            Some(exit) if self.entry_price > 0.0 => Some(exit / self.entry_price - 1.0),
            _ => None,
        }
    }
}

/// Output of one simulation run over a price series.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub strategy_returns: Vec<ReturnPoint>,
    pub benchmark_returns: Vec<ReturnPoint>,
    pub strategy_equity: Vec<EquityPoint>,
    pub benchmark_equity: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}

/// Run the simulation for one aligned (prices, signals) pair.
///
/// Strategy return at t+1 = position(t) × (price(t+1)/price(t) − 1);
/// benchmark return at t+1 is the unconditional always-long counterpart.
/// Equity curves are cumulative products of (1 + return) starting at 1.0 on
/// the first timestamp. Single unit position, no costs or sizing.
/// Fails with `InsufficientData` on fewer than 2 observations and with
/// `MisalignedSeries` when signals do not share the price timestamps.
pub fn simulate(
    prices: &PriceSeries,
    signals: &[SignalPoint],
) -> Result<Simulation, MatraderError> {
    if prices.len() < 2 {
        return Err(MatraderError::InsufficientData {
            ticker: prices.ticker().to_string(),
            have: prices.len(),
            need: 2,
        });
    }
    if signals.len() != prices.len() {
        return Err(MatraderError::MisalignedSeries {
            reason: format!(
                "price series has {} points, signal has {}",
                prices.len(),
                signals.len()
            ),
        });
    }

    let points = prices.points();
    let mut strategy_returns = Vec::with_capacity(points.len() - 1);
    let mut benchmark_returns = Vec::with_capacity(points.len() - 1);
    let mut strategy_equity = Vec::with_capacity(points.len());
    let mut benchmark_equity = Vec::with_capacity(points.len());

    strategy_equity.push(EquityPoint {
        date: points[0].date,
        equity: 1.0,
    });
    benchmark_equity.push(EquityPoint {
        date: points[0].date,
        equity: 1.0,
    });

    let mut strategy_value = 1.0_f64;
    let mut benchmark_value = 1.0_f64;

    for i in 1..points.len() {
        if signals[i].date != points[i].date {
            return Err(MatraderError::MisalignedSeries {
                reason: format!(
                    "date mismatch at index {}: {} vs {}",
                    i, signals[i].date, points[i].date
                ),
            });
        }

        let prev = points[i - 1].close;
        let period_return = if prev > 0.0 {
            points[i].close / prev - 1.0
        } else {
            0.0
        };

        // Position held at the start of the period decides the exposure.
        let strategy_return = match signals[i - 1].position {
            Position::Long => period_return,
            Position::Flat => 0.0,
        };

        strategy_value *= 1.0 + strategy_return;
        benchmark_value *= 1.0 + period_return;

        strategy_returns.push(ReturnPoint {
            date: points[i].date,
            value: strategy_return,
        });
        benchmark_returns.push(ReturnPoint {
            date: points[i].date,
            value: period_return,
        });
        strategy_equity.push(EquityPoint {
            date: points[i].date,
            equity: strategy_value,
        });
        benchmark_equity.push(EquityPoint {
            date: points[i].date,
            equity: benchmark_value,
        });
    }

    Ok(Simulation {
        strategy_returns,
        benchmark_returns,
        strategy_equity,
        benchmark_equity,
        trades: enumerate_trades(prices, signals),
    })
}

/// Walk the signal for FLAT→LONG / LONG→FLAT transitions and record the
/// trades they imply, priced at the transition timestamp's close.
fn enumerate_trades(prices: &PriceSeries, signals: &[SignalPoint]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut open: Option<(NaiveDate, f64)> = None;

    for (signal, point) in signals.iter().zip(prices.points()) {
        match signal.position {
            Position::Long => {
                if open.is_none() {
                    open = Some((point.date, point.close));
                }
            }
            Position::Flat => {
                if let Some((entry_date, entry_price)) = open.take() {
                    trades.push(Trade {
                        entry_date,
                        entry_price,
                        exit_date: Some(point.date),
                        exit_price: Some(point.close),
                    });
                }
            }
        }
    }

    if let Some((entry_date, entry_price)) = open {
        trades.push(Trade {
            entry_date,
            entry_price,
            exit_date: None,
            exit_price: None,
        });
    }

    trades
}
