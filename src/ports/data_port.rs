//! Price data access port trait.

use crate::domain::error::MatraderError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for one ticker inside the date range, sorted by date.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, MatraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, MatraderError>;

    /// First date, last date and observation count for a ticker, or `None`
    /// when the ticker has no data at all.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MatraderError>;
}
