//! Binance REST API client implementation

use chrono::Utc;
use std::time::Duration;
use tracing::debug;

use super::types::{FetchError, KlineRow, Ticker24hr};
use crate::market_data::{Candle, Period, TickerRow};

/// Binance REST API client
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BinanceRestClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl BinanceRestClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    /// Fetch the latest 24h ticker statistics for a symbol
    pub async fn fetch_ticker(&self, symbol: &str) -> Result<TickerRow, FetchError> {
        let url = format!("{}/api/v3/ticker/24hr?symbol={}", self.base_url, symbol);

        debug!("Fetching 24hr ticker from: {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatusError(status, body));
        }

        let ticker: Ticker24hr = response.json().await?;
        ticker_to_row(&ticker)
    }

    /// Fetch historical candles for a symbol at the given interval
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<Candle>, FetchError> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            symbol,
            period.interval(),
            period.limit()
        );

        debug!("Fetching klines from: {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatusError(status, body));
        }

        let rows: Vec<KlineRow> = response.json().await?;

        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            candles.push(kline_to_candle(row)?);
        }

        debug!("Fetched {} candles for {} at {}", candles.len(), symbol, period.interval());

        Ok(candles)
    }
}

fn parse_decimal(field: &str, value: &str) -> Result<f64, FetchError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| FetchError::ParseError(format!("invalid {}: {:?}", field, value)))
}

fn ticker_to_row(ticker: &Ticker24hr) -> Result<TickerRow, FetchError> {
    Ok(TickerRow {
        symbol: ticker.symbol.clone(),
        last_price: parse_decimal("lastPrice", &ticker.last_price)?,
        change_percent: parse_decimal("priceChangePercent", &ticker.price_change_percent)?,
        high_24h: parse_decimal("highPrice", &ticker.high_price)?,
        low_24h: parse_decimal("lowPrice", &ticker.low_price)?,
        volume_base: parse_decimal("volume", &ticker.volume)?,
        volume_quote: parse_decimal("quoteVolume", &ticker.quote_volume)?,
        trade_count: ticker.count,
        updated_at_ms: Utc::now().timestamp_millis() as u64,
        price_text: Some(ticker.last_price.clone()),
        high_text: Some(ticker.high_price.clone()),
        low_text: Some(ticker.low_price.clone()),
    })
}

fn kline_to_candle(row: &KlineRow) -> Result<Candle, FetchError> {
    let (
        open_time_ms,
        open,
        high,
        low,
        close,
        volume,
        close_time_ms,
        quote_volume,
        trade_count,
        taker_buy_base,
        taker_buy_quote,
        _ignore,
    ) = row;

    Ok(Candle {
        open_time_ms: *open_time_ms,
        close_time_ms: *close_time_ms,
        open: parse_decimal("open", open)?,
        high: parse_decimal("high", high)?,
        low: parse_decimal("low", low)?,
        close: parse_decimal("close", close)?,
        volume: parse_decimal("volume", volume)?,
        quote_volume: parse_decimal("quoteVolume", quote_volume)?,
        trade_count: *trade_count,
        taker_buy_base: parse_decimal("takerBuyBase", taker_buy_base)?,
        taker_buy_quote: parse_decimal("takerBuyQuote", taker_buy_quote)?,
        open_text: Some(open.clone()),
        high_text: Some(high.clone()),
        low_text: Some(low.clone()),
        close_text: Some(close.clone()),
    })
}
