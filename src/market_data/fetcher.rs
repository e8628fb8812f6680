//! Background refresh task
//!
//! Pulls 24h ticker statistics for every configured symbol on a fixed
//! cadence and publishes them into the shared table in one locked pass.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::shared::SharedMarketState;
use super::{FetchStatus, TickerRow};
use crate::binance::BinanceRestClient;

pub struct Fetcher {
    shared: Arc<SharedMarketState>,
    client: BinanceRestClient,
    symbols: Vec<String>,
    refresh_interval: Duration,
    scratch: Vec<TickerRow>,
    updated: Vec<bool>,
}

impl Fetcher {
    pub fn new(
        shared: Arc<SharedMarketState>,
        client: BinanceRestClient,
        symbols: Vec<String>,
        refresh_interval_secs: u64,
    ) -> Self {
        let scratch = symbols.iter().map(|s| TickerRow::empty(s)).collect();
        let updated = vec![false; symbols.len()];
        Self {
            shared,
            client,
            symbols,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            scratch,
            updated,
        }
    }

    /// One synchronous fetch-and-publish pass, run once behind the splash
    /// screen so the first frame has data
    pub async fn prime(&mut self) {
        self.run_cycle().await;
    }

    /// Run fetch cycles until shutdown is requested
    ///
    /// The initial cycle is expected to have happened via [`prime`], so
    /// each iteration sleeps first.
    pub async fn run(mut self) {
        while self.shared.is_running() {
            self.sleep_interval().await;
            if !self.shared.is_running() {
                break;
            }
            self.run_cycle().await;
        }
        debug!("Fetcher stopped");
    }

    async fn run_cycle(&mut self) {
        self.shared.set_status(FetchStatus::Fetching);
        self.updated.fill(false);

        let mut had_failure = false;
        for i in 0..self.symbols.len() {
            if !self.shared.is_running() {
                break;
            }
            match self.client.fetch_ticker(&self.symbols[i]).await {
                Ok(row) => {
                    self.scratch[i] = row;
                    self.updated[i] = true;
                }
                Err(err) => {
                    warn!("Ticker fetch failed for {}: {}", self.symbols[i], err);
                    had_failure = true;
                }
            }
        }

        // Single locked pass; rows that failed keep their previous value
        self.shared.publish(&self.scratch, &self.updated);
        self.shared.set_status(if had_failure {
            FetchStatus::NetworkError
        } else {
            FetchStatus::Normal
        });
    }

    /// Sleep the refresh interval in one-second steps, re-checking the
    /// running flag so shutdown latency stays bounded
    async fn sleep_interval(&self) {
        let mut remaining = self.refresh_interval;
        while !remaining.is_zero() && self.shared.is_running() {
            let step = remaining.min(Duration::from_secs(1));
            tokio::time::sleep(step).await;
            remaining = remaining.saturating_sub(step);
        }
    }
}
