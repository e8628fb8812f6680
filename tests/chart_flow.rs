//! Chart open and reload flows against a mock exchange

use std::sync::Arc;

use coinboard::binance::BinanceRestClient;
use coinboard::chart::ChartEngine;
use coinboard::market_data::{Period, SharedMarketState};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DAY_MS: u64 = 86_400_000;
const T0: u64 = 1_700_000_000_000;

fn kline(open_time_ms: u64, open: &str, close: &str) -> serde_json::Value {
    json!([
        open_time_ms,
        open,
        "45000.00000000",
        "41000.00000000",
        close,
        "1000.00000000",
        open_time_ms + DAY_MS - 1,
        "43000000.00000000",
        5000,
        "500.00000000",
        "21500000.00000000",
        "0"
    ])
}

fn engine_for(server: &MockServer, names: &[&str]) -> ChartEngine {
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    let shared = Arc::new(SharedMarketState::new(&names));
    let client = BinanceRestClient::new(server.uri(), 5);
    ChartEngine::new(shared, client)
}

/// Opening a chart lands the cursor on the newest candle with follow active
#[tokio::test]
async fn open_selects_newest_candle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(T0, "42000.0", "42500.0"),
            kline(T0 + DAY_MS, "42500.0", "43000.0"),
            kline(T0 + 2 * DAY_MS, "43000.0", "43800.0"),
        ])))
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, &["BTCUSDT"]);
    assert!(engine.open(0).await, "open should succeed");

    let data = engine.data().expect("chart holds data after open");
    assert_eq!(data.symbol(), "BTCUSDT");
    assert_eq!(data.candles().len(), 3);
    assert_eq!(data.cursor(), Some(2));
    assert!(data.follow_latest());
    assert_eq!(engine.period(), Period::OneDay);
}

/// A failed candle fetch leaves the chart closed
#[tokio::test]
async fn open_failure_leaves_chart_closed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, &["BTCUSDT"]);
    assert!(!engine.open(0).await);
    assert!(!engine.is_open());

    assert!(!engine.open(7).await, "out-of-range symbol index is rejected");
}

/// Fetch-then-swap: a failed interval change keeps the buffer and period
#[tokio::test]
async fn period_change_failure_keeps_current_chart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(T0, "42000.0", "42500.0"),
            kline(T0 + DAY_MS, "42500.0", "43000.0"),
        ])))
        .mount(&server)
        .await;
    // No mock for 1w, so that request fails

    let mut engine = engine_for(&server, &["BTCUSDT"]);
    assert!(engine.open(0).await);

    assert!(!engine.change_period(true).await, "1w reload must fail");
    assert_eq!(engine.period(), Period::OneDay);
    let data = engine.data().expect("chart stays open");
    assert_eq!(data.candles().len(), 2, "old buffer survives the failure");
    assert_eq!(data.cursor(), Some(1));
}

/// Changing the interval swaps the buffer and clamps the cursor into it
#[tokio::test]
async fn period_change_swaps_buffer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(T0, "42000.0", "42500.0"),
            kline(T0 + DAY_MS, "42500.0", "43000.0"),
            kline(T0 + 2 * DAY_MS, "43000.0", "43800.0"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("interval", "1w"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([kline(T0, "42000.0", "43800.0")])),
        )
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, &["BTCUSDT"]);
    assert!(engine.open(0).await);
    assert!(engine.change_period(true).await);

    assert_eq!(engine.period(), Period::OneWeek);
    let data = engine.data().expect("chart stays open");
    assert_eq!(data.candles().len(), 1);
    assert_eq!(data.cursor(), Some(0), "cursor clamps into the shorter buffer");
}

/// A reload keeps the selection on the same open time even when rows shift
#[tokio::test]
async fn force_refresh_tracks_selected_timestamp() {
    let server = MockServer::start().await;
    // First load serves once, then the shifted reload takes over
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(T0, "42000.0", "42500.0"),
            kline(T0 + DAY_MS, "42500.0", "43000.0"),
            kline(T0 + 2 * DAY_MS, "43000.0", "43800.0"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(T0 + DAY_MS, "42500.0", "43000.0"),
            kline(T0 + 2 * DAY_MS, "43000.0", "43800.0"),
            kline(T0 + 3 * DAY_MS, "43800.0", "44100.0"),
        ])))
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, &["BTCUSDT"]);
    assert!(engine.open(0).await);
    engine.set_cursor(1);

    assert!(engine.force_refresh().await);
    let data = engine.data().expect("chart stays open");
    assert_eq!(data.candles().len(), 3);
    assert_eq!(
        data.cursor(),
        Some(0),
        "selected open time moved to the head of the reloaded buffer"
    );
    assert!(!data.follow_latest());
}

/// While follow is active, a reload snaps the cursor to the newest candle
#[tokio::test]
async fn force_refresh_follows_to_newest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(T0, "42000.0", "42500.0"),
            kline(T0 + DAY_MS, "42500.0", "43000.0"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            kline(T0, "42000.0", "42500.0"),
            kline(T0 + DAY_MS, "42500.0", "43000.0"),
            kline(T0 + 2 * DAY_MS, "43000.0", "43800.0"),
        ])))
        .mount(&server)
        .await;

    let mut engine = engine_for(&server, &["BTCUSDT"]);
    assert!(engine.open(0).await);
    assert!(engine.data().expect("open chart").follow_latest());

    assert!(engine.force_refresh().await);
    let data = engine.data().expect("chart stays open");
    assert_eq!(data.candles().len(), 3);
    assert_eq!(data.cursor(), Some(2), "follow pins the newest candle");
}
