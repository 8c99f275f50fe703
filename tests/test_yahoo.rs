use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use chrono::NaiveDate;
use serde_json::json;

use option_bets::ChainError;
use option_bets::model::OptionType;
use option_bets::source::{QuoteSource, YahooEndpoints, YahooSource};

// 2020-06-19, 2020-06-26 and 2020-07-17, 00:00:00 UTC
const JUN_19: i64 = 1_592_524_800;
const JUN_26: i64 = 1_593_129_600;
const JUL_17: i64 = 1_594_944_000;

const CRUMB: &str = "Xy7.crumb";

/// Stand-in for the quote service: cookie page, crumb endpoint, options chain.
#[derive(Default)]
struct MockYahoo {
    withhold_cookie: bool,
    chain_requests: Mutex<Vec<Option<i64>>>,
}

type Shared = Arc<MockYahoo>;

async fn cookie_page(State(mock): State<Shared>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    if !mock.withhold_cookie {
        headers.insert(header::SET_COOKIE, "A3=session-1; Path=/".parse().unwrap());
    }
    (StatusCode::NOT_FOUND, headers, "")
}

async fn get_crumb(headers: HeaderMap) -> impl IntoResponse {
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("A3=session-1"));
    if has_session {
        (StatusCode::OK, CRUMB.to_string())
    } else {
        (StatusCode::UNAUTHORIZED, String::new())
    }
}

async fn options(
    State(mock): State<Shared>,
    Path(ticker): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if params.get("crumb").map(String::as_str) != Some(CRUMB) {
        let body = json!({"finance": {"error": {"code": "Unauthorized", "description": "Invalid Crumb"}}});
        return (StatusCode::UNAUTHORIZED, body.to_string());
    }

    let date = params.get("date").and_then(|d| d.parse::<i64>().ok());
    mock.chain_requests.lock().unwrap().push(date);

    let options = match date {
        None => json!([]),
        Some(ts) => json!([{
            "expirationDate": ts,
            "calls": [{ "strike": 180.0, "lastPrice": 9.5, "volume": 120, "expiration": ts }],
            "puts": [{ "strike": 185.0, "lastPrice": 3.1, "volume": 45, "expiration": ts }],
        }]),
    };
    let body = json!({
        "optionChain": {
            "result": [{
                "underlyingSymbol": ticker,
                "expirationDates": [JUN_19, JUN_26, JUL_17],
                "quote": { "symbol": ticker, "regularMarketPrice": 187.2 },
                "options": options,
            }],
            "error": null
        }
    });
    (StatusCode::OK, body.to_string())
}

async fn serve(mock: Shared) -> SocketAddr {
    let app = Router::new()
        .route("/", get(cookie_page))
        .route("/v1/test/getcrumb", get(get_crumb))
        .route("/v7/finance/options/{ticker}", get(options))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn source_for(addr: SocketAddr) -> YahooSource {
    YahooSource::with_endpoints(YahooEndpoints {
        options_url: format!("http://{addr}/v7/finance/options"),
        cookie_url: format!("http://{addr}/"),
        crumb_url: format!("http://{addr}/v1/test/getcrumb"),
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_requests_each_expiration_in_month() {
    let mock = Shared::default();
    let addr = serve(mock.clone()).await;

    let rows = source_for(addr).fetch("MSFT", 6, 2020).await.unwrap();

    // Listing first, then only the June expirations
    assert_eq!(
        *mock.chain_requests.lock().unwrap(),
        vec![None, Some(JUN_19), Some(JUN_26)]
    );

    let kinds: Vec<(NaiveDate, OptionType)> = rows.iter().map(|r| (r.expiry, r.option_type)).collect();
    let jun_19 = NaiveDate::from_ymd_opt(2020, 6, 19).unwrap();
    let jun_26 = NaiveDate::from_ymd_opt(2020, 6, 26).unwrap();
    assert_eq!(
        kinds,
        vec![
            (jun_19, OptionType::Call),
            (jun_19, OptionType::Put),
            (jun_26, OptionType::Call),
            (jun_26, OptionType::Put),
        ]
    );
    assert!(rows.iter().all(|r| r.underlying_price == 187.2));
}

#[tokio::test]
async fn test_fetch_month_without_expirations_is_empty() {
    let mock = Shared::default();
    let addr = serve(mock.clone()).await;

    let rows = source_for(addr).fetch("MSFT", 8, 2020).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(*mock.chain_requests.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn test_fetch_without_session_cookie_fails() {
    let mock = Arc::new(MockYahoo {
        withhold_cookie: true,
        ..Default::default()
    });
    let addr = serve(mock.clone()).await;

    let err = source_for(addr).fetch("MSFT", 6, 2020).await.unwrap_err();
    match err {
        ChainError::Http(e) => assert_eq!(e.status(), Some(reqwest::StatusCode::UNAUTHORIZED)),
        other => panic!("expected HTTP 401, got {other:?}"),
    }
    assert!(mock.chain_requests.lock().unwrap().is_empty());
}
