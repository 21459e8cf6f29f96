//! Price series representation.

use crate::domain::error::MatraderError;
use chrono::NaiveDate;

/// One closing-price observation for a trading period.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ordered closing prices for a single ticker, one observation per trading
/// period. Dates are strictly increasing; the series is immutable once built
/// and passed by reference into every pipeline stage.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting out-of-order or duplicate dates.
    pub fn new(ticker: String, points: Vec<PricePoint>) -> Result<Self, MatraderError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(MatraderError::Data {
                    ticker,
                    reason: format!(
                        "dates not strictly increasing: {} followed by {}",
                        pair[0].date, pair[1].date
                    ),
                });
            }
        }
        Ok(Self { ticker, points })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
