#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use option_bets::ChainError;
use option_bets::model::{OptionType, QuoteRow};
use option_bets::source::QuoteSource;

/// In-memory quote source returning fixed rows for the requested month.
pub struct StaticSource {
    pub rows: Vec<QuoteRow>,
}

#[async_trait]
impl QuoteSource for StaticSource {
    async fn fetch(&self, _ticker: &str, month: u32, year: i32) -> Result<Vec<QuoteRow>, ChainError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.expiry.month() == month && r.expiry.year() == year)
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Source that always fails like an unreachable service.
pub struct FailingSource;

#[async_trait]
impl QuoteSource for FailingSource {
    async fn fetch(&self, ticker: &str, _month: u32, _year: i32) -> Result<Vec<QuoteRow>, ChainError> {
        Err(ChainError::Service {
            message: format!("No data found for {ticker}"),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

pub fn jun_19() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 6, 19).unwrap()
}

pub fn jun_26() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 6, 26).unwrap()
}

pub fn quote(
    strike: f64,
    last: f64,
    option_type: OptionType,
    volume: Option<u64>,
    expiry: NaiveDate,
    price: f64,
) -> QuoteRow {
    QuoteRow {
        strike,
        last,
        option_type,
        volume,
        expiry,
        underlying_price: price,
    }
}

pub fn call(strike: f64, volume: u64) -> QuoteRow {
    quote(strike, 150.0 / strike, OptionType::Call, Some(volume), jun_19(), 150.0)
}

pub fn put(strike: f64, volume: u64) -> QuoteRow {
    quote(strike, strike / 150.0, OptionType::Put, Some(volume), jun_19(), 150.0)
}

/// A mixed chain around a current price of 150, with a second expiry in the same month.
pub fn msft_chain() -> Vec<QuoteRow> {
    let mut rows = Vec::new();
    for strike in [20.0, 100.0, 130.0, 140.0, 150.0, 160.0, 175.0, 250.0, 300.0] {
        rows.push(call(strike, strike as u64));
    }
    for strike in [20.0, 100.0, 140.0, 150.0, 160.0, 170.0, 200.0, 280.0] {
        rows.push(put(strike, 2 * strike as u64));
    }
    rows.push(quote(150.0, 4.0, OptionType::Call, None, jun_26(), 150.0));
    rows.push(quote(150.0, 4.0, OptionType::Put, Some(5), jun_26(), 150.0));
    rows
}
