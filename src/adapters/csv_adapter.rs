//! CSV file data adapter.
//!
//! Reads one `{TICKER}.csv` file per ticker with a `date,close` header.

use crate::domain::error::MatraderError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_points(&self, ticker: &str) -> Result<Vec<PricePoint>, MatraderError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| MatraderError::Data {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| MatraderError::Data {
                ticker: ticker.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| MatraderError::Data {
                ticker: ticker.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                MatraderError::Data {
                    ticker: ticker.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            let close: f64 = record
                .get(1)
                .ok_or_else(|| MatraderError::Data {
                    ticker: ticker.to_string(),
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| MatraderError::Data {
                    ticker: ticker.to_string(),
                    reason: format!("invalid close value: {}", e),
                })?;

            points.push(PricePoint { date, close });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MatraderError> {
        let points: Vec<PricePoint> = self
            .read_points(ticker)?
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
        let entries = fs::read_dir(&self.base_path).map_err(|e| MatraderError::Data {
            ticker: String::new(),
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| MatraderError::Data {
                ticker: String::new(),
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MatraderError> {
        if !self.csv_path(ticker).exists() {
            return Ok(None);
        }

        let points = self.read_points(ticker)?;
        match (points.first(), points.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, points.len()))),
            _ => Ok(None),
        }
    }
}
