use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Invalid expiration date `{input}`; required format yyyy-mm-dd")]
    InvalidDate { input: String },

    #[error("Invalid {name} `{value}`")]
    InvalidThreshold { name: &'static str, value: String },

    #[error("Unknown chart format `{format}`. Use: pdf, svg, png")]
    UnknownFormat { format: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Quote service error: {message}")]
    Service { message: String },

    #[error("Malformed quote payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No option quotes returned for {ticker} (expiration {date})")]
    EmptyChain { ticker: String, date: NaiveDate },

    #[error("Underlying price {price} for {ticker} is not a positive number")]
    InvalidUnderlying { ticker: String, price: f64 },
}
