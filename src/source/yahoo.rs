use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ChainError;
use crate::model::{OptionType, QuoteRow};

use super::QuoteSource;

const YAHOO_OPTIONS_URL: &str = "https://query2.finance.yahoo.com/v7/finance/options";
const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
const YAHOO_CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";

// Yahoo refuses sessions for non-browser agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionsResponse {
    option_chain: OptionChainEnvelope,
}

#[derive(Debug, Deserialize)]
struct OptionChainEnvelope {
    #[serde(default)]
    result: Vec<ChainResult>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainResult {
    #[serde(default)]
    expiration_dates: Vec<i64>,
    quote: Option<UnderlyingQuote>,
    #[serde(default)]
    options: Vec<ExpirationChain>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnderlyingQuote {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ExpirationChain {
    #[serde(default)]
    calls: Vec<ContractEntry>,
    #[serde(default)]
    puts: Vec<ContractEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractEntry {
    strike: f64,
    last_price: Option<f64>,
    volume: Option<u64>,
    expiration: i64,
}

// ── Source ───────────────────────────────────────────────────────────

/// Where [`YahooSource`] sends its requests.
#[derive(Debug, Clone)]
pub struct YahooEndpoints {
    /// Options chain, `<options_url>/<ticker>[?date=<unix>]`.
    pub options_url: String,
    /// Any page that sets the session cookie.
    pub cookie_url: String,
    /// Returns the crumb paired with the session cookie.
    pub crumb_url: String,
}

impl Default for YahooEndpoints {
    fn default() -> Self {
        YahooEndpoints {
            options_url: YAHOO_OPTIONS_URL.to_string(),
            cookie_url: YAHOO_COOKIE_URL.to_string(),
            crumb_url: YAHOO_CRUMB_URL.to_string(),
        }
    }
}

/// Option chains from the Yahoo Finance options endpoint.
///
/// Every `fetch` opens a session first: a cookie from `cookie_url`, then a
/// crumb from `crumb_url` sent with each chain request.
pub struct YahooSource {
    client: reqwest::Client,
    endpoints: YahooEndpoints,
}

impl YahooSource {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_endpoints(YahooEndpoints::default())
    }

    pub fn with_endpoints(endpoints: YahooEndpoints) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .context("creating Yahoo HTTP client")?;

        Ok(YahooSource { client, endpoints })
    }

    /// Obtain the session cookie and its crumb.
    async fn crumb(&self) -> Result<String, ChainError> {
        // The cookie page answers 404 but still sets the cookie.
        let resp = self.client.get(&self.endpoints.cookie_url).send().await?;
        debug!(status = %resp.status(), "opened quote session");

        let crumb = self
            .client
            .get(&self.endpoints.crumb_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let crumb = crumb.trim();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(ChainError::Service {
                message: "quote service returned no crumb".to_string(),
            });
        }
        Ok(crumb.to_string())
    }

    async fn get_chain(
        &self,
        ticker: &str,
        crumb: &str,
        date: Option<i64>,
    ) -> Result<ChainResult, ChainError> {
        let url = format!("{}/{}", self.endpoints.options_url.trim_end_matches('/'), ticker);
        let mut req = self.client.get(&url).query(&[("crumb", crumb)]);
        if let Some(ts) = date {
            req = req.query(&[("date", ts)]);
        }
        debug!(%url, ?date, "requesting option chain");

        let body = req.send().await?.error_for_status()?.text().await?;
        decode_chain(&body)
    }
}

#[async_trait]
impl QuoteSource for YahooSource {
    async fn fetch(&self, ticker: &str, month: u32, year: i32) -> Result<Vec<QuoteRow>, ChainError> {
        let crumb = self.crumb().await?;
        let listing = self.get_chain(ticker, &crumb, None).await?;
        let price = underlying_price(&listing)?;

        let expirations: Vec<i64> = listing
            .expiration_dates
            .iter()
            .copied()
            .filter(|ts| in_month(*ts, month, year))
            .collect();
        info!(
            %ticker,
            month,
            year,
            listed = listing.expiration_dates.len(),
            in_month = expirations.len(),
            "resolved expirations"
        );

        let mut rows = Vec::new();
        for ts in expirations {
            let chain = self.get_chain(ticker, &crumb, Some(ts)).await?;
            rows.extend(chain_rows(&chain, price));
        }
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

// ── Decoding ─────────────────────────────────────────────────────────

fn decode_chain(body: &str) -> Result<ChainResult, ChainError> {
    let resp: OptionsResponse = serde_json::from_str(body)?;
    if let Some(err) = resp.option_chain.error {
        return Err(ChainError::Service {
            message: format!(
                "{}: {}",
                err.code.unwrap_or_else(|| "error".to_string()),
                err.description.unwrap_or_default()
            ),
        });
    }
    resp.option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| ChainError::Service {
            message: "empty option chain result".to_string(),
        })
}

fn underlying_price(chain: &ChainResult) -> Result<f64, ChainError> {
    chain
        .quote
        .as_ref()
        .and_then(|q| q.regular_market_price)
        .ok_or_else(|| ChainError::Service {
            message: "quote has no regular market price".to_string(),
        })
}

/// Flatten every expiration block, calls before puts.
fn chain_rows(chain: &ChainResult, price: f64) -> Vec<QuoteRow> {
    let mut rows = Vec::new();
    for block in &chain.options {
        for (entries, option_type) in [(&block.calls, OptionType::Call), (&block.puts, OptionType::Put)] {
            rows.extend(entries.iter().filter_map(|c| {
                Some(QuoteRow {
                    strike: c.strike,
                    last: c.last_price.unwrap_or(0.0),
                    option_type,
                    volume: c.volume,
                    expiry: utc_date(c.expiration)?,
                    underlying_price: price,
                })
            }));
        }
    }
    rows
}

fn utc_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

fn in_month(ts: i64, month: u32, year: i32) -> bool {
    utc_date(ts).is_some_and(|d| d.month() == month && d.year() == year)
}
