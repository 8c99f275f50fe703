use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Datelike;

use crate::error::ChainError;
use crate::model::QuoteRow;

use super::QuoteSource;

/// Replays quotes previously saved with `--save-csv`.
///
/// The file is not tied to a ticker; every row whose expiry falls in the
/// requested month is returned, in file order.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: &Path) -> Self {
        CsvSource {
            path: path.to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Vec<QuoteRow>, ChainError> {
        let mut rdr = csv::Reader::from_path(&self.path)?;
        let rows = rdr.deserialize().collect::<Result<Vec<QuoteRow>, _>>()?;
        Ok(rows)
    }
}

#[async_trait]
impl QuoteSource for CsvSource {
    async fn fetch(&self, _ticker: &str, month: u32, year: i32) -> Result<Vec<QuoteRow>, ChainError> {
        let rows = self
            .load()?
            .into_iter()
            .filter(|r| r.expiry.month() == month && r.expiry.year() == year)
            .collect();
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
