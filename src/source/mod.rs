pub mod replay;
pub mod yahoo;

use std::path::Path;

use async_trait::async_trait;

use crate::error::ChainError;
use crate::model::QuoteRow;

pub use replay::CsvSource;
pub use yahoo::{YahooEndpoints, YahooSource};

/// Retrieves every option quote for a ticker expiring in a given month.
///
/// Rows come back in retrieval order; the first row's underlying price is
/// the run's snapshot price.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self, ticker: &str, month: u32, year: i32) -> Result<Vec<QuoteRow>, ChainError>;

    /// Short name for log lines.
    fn name(&self) -> &'static str;
}

/// Write quotes to a CSV file readable by [`CsvSource`].
pub fn write_quotes(path: &Path, rows: &[QuoteRow]) -> Result<(), ChainError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
