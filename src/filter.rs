use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::ChainError;
use crate::model::{ChainSlice, FilteredQuote, OptionType, QuoteRow};

/// Narrow a raw retrieval to one expiration and split it into calls and puts.
///
/// The current price is the first raw row's underlying price, taken before
/// any filtering; callers must pass rows in retrieval order. Fails when
/// `rows` is empty or that price is not a positive number. An expiration
/// with no matching rows is not an error and yields an empty slice.
pub fn filter_chain(
    ticker: &str,
    rows: &[QuoteRow],
    expiration: NaiveDate,
    deviation: f64,
) -> Result<ChainSlice, ChainError> {
    let current_price = current_price(ticker, rows, expiration)?;

    let for_date: Vec<&QuoteRow> = rows.iter().filter(|r| r.expiry == expiration).collect();
    if for_date.is_empty() {
        warn!(%ticker, %expiration, "no contracts for expiration date");
    }

    let retained: Vec<FilteredQuote> = for_date
        .iter()
        .map(|r| FilteredQuote {
            quote: (*r).clone(),
            pct_change: (r.strike - current_price) / current_price,
        })
        .filter(|q| q.pct_change.abs() <= deviation)
        .collect();

    let (calls, puts): (Vec<_>, Vec<_>) = retained
        .into_iter()
        .partition(|q| q.quote.option_type == OptionType::Call);

    info!(
        %ticker,
        %expiration,
        current_price,
        for_date = for_date.len(),
        calls = calls.len(),
        puts = puts.len(),
        "filtered chain by strike deviation"
    );

    Ok(ChainSlice {
        calls,
        puts,
        current_price,
    })
}

/// Snapshot price for the run: the first retrieved row's underlying price.
fn current_price(ticker: &str, rows: &[QuoteRow], expiration: NaiveDate) -> Result<f64, ChainError> {
    let first = rows.first().ok_or_else(|| ChainError::EmptyChain {
        ticker: ticker.to_string(),
        date: expiration,
    })?;
    let price = first.underlying_price;
    if !(price.is_finite() && price > 0.0) {
        return Err(ChainError::InvalidUnderlying {
            ticker: ticker.to_string(),
            price,
        });
    }
    Ok(price)
}

/// Drop deep in-the-money contracts.
///
/// Keeps calls with `strike >= price * (1 - threshold)` and puts with
/// `strike <= price * (1 + threshold)`.
pub fn exclude_deep_itm(slice: ChainSlice, threshold: f64) -> ChainSlice {
    let call_floor = slice.current_price * (1.0 - threshold);
    let put_ceiling = slice.current_price * (1.0 + threshold);

    let calls: Vec<_> = slice
        .calls
        .into_iter()
        .filter(|q| q.strike() >= call_floor)
        .collect();
    let puts: Vec<_> = slice
        .puts
        .into_iter()
        .filter(|q| q.strike() <= put_ceiling)
        .collect();

    info!(
        call_floor,
        put_ceiling,
        calls = calls.len(),
        puts = puts.len(),
        "excluded deep in-the-money contracts"
    );

    ChainSlice {
        calls,
        puts,
        current_price: slice.current_price,
    }
}
