#![allow(dead_code)]

use chrono::NaiveDate;
use matrader::domain::error::MatraderError;
use matrader::domain::price::{PricePoint, PriceSeries};
use matrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MatraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(MatraderError::Data {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        let points: Vec<PricePoint> = self
            .data
            .get(ticker)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();
        if points.is_empty() {
            return Err(MatraderError::NoData {
                ticker: ticker.to_string(),
            });
        }
        PriceSeries::new(ticker.to_string(), points)
    }

    fn list_tickers(&self) -> Result<Vec<String>, MatraderError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MatraderError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(MatraderError::Data {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_point(date_str: &str, close: f64) -> PricePoint {
    PricePoint {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        close,
    }
}

pub fn make_series(ticker: &str, closes: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 2);
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            close,
        })
        .collect();
    PriceSeries::new(ticker.to_string(), points).unwrap()
}

/// Deterministic wavy price path with several crossovers.
pub fn generate_prices(start_date: &str, count: usize, start_price: f64) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            close: start_price + 10.0 * (i as f64 * 0.4).sin() + i as f64 * 0.1,
        })
        .collect()
}
