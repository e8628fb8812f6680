//! Binance API data types and structures

use serde::Deserialize;

/// 24hr ticker statistics from the REST API
///
/// Binance encodes decimals as strings; parsing into f64 happens in the
/// REST client so a malformed field surfaces as a typed error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hr {
    pub symbol: String,
    pub last_price: String,
    pub price_change_percent: String,
    pub high_price: String,
    pub low_price: String,
    pub volume: String,
    pub quote_volume: String,
    pub count: u64,
}

/// One kline row as the REST API returns it: a 12-element array of
/// numbers and string-encoded decimals
///
/// Fields in order: open time (ms), open, high, low, close, volume,
/// close time (ms), quote asset volume, trade count, taker buy base
/// volume, taker buy quote volume, and an unused legacy field.
pub type KlineRow = (
    u64,
    String,
    String,
    String,
    String,
    String,
    u64,
    String,
    u64,
    String,
    String,
    serde_json::Value,
);

/// Error types for REST API operations
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    HttpRequestError(#[from] reqwest::Error),
    #[error("HTTP status error: {0} - {1}")]
    HttpStatusError(u16, String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
