use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Contract type of an option quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

/// One options contract observation from the quote source.
///
/// Also the CSV row layout used by `--from-csv` and `--save-csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRow {
    pub strike: f64,
    /// Last traded premium.
    pub last: f64,
    pub option_type: OptionType,
    /// Contracts traded; `None` when the source reports nothing.
    pub volume: Option<u64>,
    pub expiry: NaiveDate,
    /// Underlying price at fetch time.
    pub underlying_price: f64,
}

impl QuoteRow {
    /// Volume with missing values counted as zero.
    pub fn volume_or_zero(&self) -> u64 {
        self.volume.unwrap_or(0)
    }
}
