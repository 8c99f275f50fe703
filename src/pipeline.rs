use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::RunConfig;
use crate::error::ChainError;
use crate::filter;
use crate::model::{ChainSlice, QuoteRow};
use crate::source::{CsvSource, QuoteSource, YahooSource, write_quotes};
use crate::visualize;

/// Retrieve the month's chain for the configured ticker and narrow it to the
/// configured expiration (strike deviation filter + call/put split).
pub async fn get_option_data(source: &dyn QuoteSource, config: &RunConfig) -> Result<ChainSlice, ChainError> {
    let rows = fetch_rows(source, config).await?;
    filter::filter_chain(
        &config.ticker,
        &rows,
        config.expiration,
        config.thresholds.deviation,
    )
}

async fn fetch_rows(
    source: &dyn QuoteSource,
    config: &RunConfig,
) -> Result<Vec<QuoteRow>, ChainError> {
    info!(
        source = source.name(),
        ticker = %config.ticker,
        month = config.month(),
        year = config.year(),
        "fetching option chain"
    );
    let rows = source
        .fetch(&config.ticker, config.month(), config.year())
        .await?;
    info!(rows = rows.len(), "fetched option chain");

    if let Some(path) = &config.save_csv {
        write_quotes(path, &rows)?;
        info!(path = %path.display(), "saved raw quotes");
    }
    Ok(rows)
}

/// Fetch, filter and chart using `source`. Returns the chart path.
pub async fn run_with(source: &dyn QuoteSource, config: &RunConfig) -> Result<PathBuf> {
    let slice = get_option_data(source, config).await.with_context(|| {
        format!(
            "getting option data for {} expiring {}",
            config.ticker, config.expiration
        )
    })?;
    let slice = filter::exclude_deep_itm(slice, config.thresholds.moneyness);
    visualize::visualize(&slice, config)
}

/// Entry point for one run: picks the quote source and drives the pipeline
/// on a single-threaded runtime.
pub fn run(config: &RunConfig) -> Result<PathBuf> {
    let source: Box<dyn QuoteSource> = match &config.from_csv {
        Some(path) => Box::new(CsvSource::new(path)),
        None => Box::new(YahooSource::new()?),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("creating async runtime")?;
    rt.block_on(run_with(source.as_ref(), config))
}
