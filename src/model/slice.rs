use super::quote::QuoteRow;

/// A quote retained by the deviation filter, with its fractional
/// distance from the current price.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredQuote {
    pub quote: QuoteRow,
    /// `(strike - current_price) / current_price`
    pub pct_change: f64,
}

impl FilteredQuote {
    pub fn strike(&self) -> f64 {
        self.quote.strike
    }

    pub fn last(&self) -> f64 {
        self.quote.last
    }

    pub fn volume(&self) -> u64 {
        self.quote.volume_or_zero()
    }
}

/// Calls and puts for one expiration, plus the snapshot price they were
/// filtered against.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSlice {
    pub calls: Vec<FilteredQuote>,
    pub puts: Vec<FilteredQuote>,
    pub current_price: f64,
}

impl ChainSlice {
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }

    /// Volumes of every call and put, calls first.
    pub fn volumes(&self) -> impl Iterator<Item = u64> + '_ {
        self.calls.iter().chain(self.puts.iter()).map(|q| q.volume())
    }
}
