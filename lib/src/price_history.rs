use chrono::NaiveDate;

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PriceStep {
    pub date : NaiveDate,
    pub close : f64
}

/// Daily close history provider, e.g. a market data HTTP API.
#[cfg_attr(test, automock)]
pub trait HistorySource {
    /// Returns the daily closes with `since_date <= date < to_date`, oldest first.
    fn fetch_close_history(&mut self, symbol : &str,
        since_date : &NaiveDate, to_date : &NaiveDate) -> anyhow::Result<Vec<PriceStep>>;
}
