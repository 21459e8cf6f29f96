//! Simple Moving Average calculator.
//!
//! O(n) sliding window over closing prices.
//! SMA(w) at i = (P[i-w+1] + ... + P[i]) / w
//! Warmup: the first (w-1) positions are undefined.

use crate::domain::error::MatraderError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

/// One point of a moving-average series. `value` is `None` during warmup,
/// where fewer than `window` observations are available.
#[derive(Debug, Clone, PartialEq)]
pub struct MaPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A moving-average series over the full timestamp domain of its source
/// price series.
#[derive(Debug, Clone)]
pub struct MaSeries {
    pub window: usize,
    pub points: Vec<MaPoint>,
}

/// Trailing arithmetic mean of the last `window` closes at each timestamp.
///
/// Fails with `InvalidWindow` when `window` is zero or exceeds the series
/// length. Pure function of its inputs.
pub fn calculate_sma(prices: &PriceSeries, window: usize) -> Result<MaSeries, MatraderError> {
    if window == 0 || window > prices.len() {
        return Err(MatraderError::InvalidWindow {
            window,
            len: prices.len(),
        });
    }

    let source = prices.points();
    let mut points = Vec::with_capacity(source.len());
    let mut window_sum: f64 = 0.0;

    for (i, point) in source.iter().enumerate() {
        window_sum += point.close;
        if i >= window {
            window_sum -= source[i - window].close;
        }

        let value = if i >= window - 1 {
            Some(window_sum / window as f64)
        } else {
            None
        };

        points.push(MaPoint {
            date: point.date,
            value,
        });
    }

    Ok(MaSeries { window, points })
}
