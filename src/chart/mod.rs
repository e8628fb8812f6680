//! Candlestick chart view state
//!
//! Owns one symbol's candle buffer, cursor, and follow/refresh policy.
//! Reloads are fetch-then-swap: the old buffer stays on screen until a
//! replacement has fully arrived, and the cursor is reconciled against
//! the candle it pointed at before the reload.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::binance::BinanceRestClient;
use crate::market_data::{Candle, Period, SharedMarketState};

/// Rendered chart window geometry, kept for hit tests and re-anchoring
///
/// `start_idx` persists across frames; the rest records where the last
/// frame actually placed the candles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartViewport {
    pub start_idx: usize,
    pub visible: usize,
    pub stride: u16,
    pub origin_x: u16,
    count: usize,
}

/// An open chart: one symbol's candles and cursor state
#[derive(Debug)]
pub struct ChartData {
    symbol: String,
    /// Cached configuration index; revalidated against the symbol string
    /// on every live price lookup
    symbol_index: usize,
    candles: Vec<Candle>,
    cursor: Option<usize>,
    follow_latest: bool,
    viewport: ChartViewport,
}

impl ChartData {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn cursor_candle(&self) -> Option<&Candle> {
        self.cursor.and_then(|c| self.candles.get(c))
    }

    pub fn follow_latest(&self) -> bool {
        self.follow_latest
    }

    pub fn viewport(&self) -> ChartViewport {
        self.viewport
    }
}

/// Chart engine: closed between selections, the period persists
pub struct ChartEngine {
    data: Option<ChartData>,
    period: Period,
    client: BinanceRestClient,
    shared: Arc<SharedMarketState>,
}

impl ChartEngine {
    pub fn new(shared: Arc<SharedMarketState>, client: BinanceRestClient) -> Self {
        Self {
            data: None,
            period: Period::default(),
            client,
            shared,
        }
    }

    pub fn is_open(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&ChartData> {
        self.data.as_ref()
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Open the chart for the symbol at a configuration index
    ///
    /// Returns false without changing state when the index is unknown or
    /// the candle fetch fails.
    pub async fn open(&mut self, symbol_index: usize) -> bool {
        let Some(symbol) = self.shared.symbol_at(symbol_index) else {
            return false;
        };
        match self.client.fetch_candles(&symbol, self.period).await {
            Ok(candles) => {
                debug!("Opened chart for {} with {} candles", symbol, candles.len());
                let cursor = candles.len().checked_sub(1);
                self.data = Some(ChartData {
                    symbol,
                    symbol_index,
                    candles,
                    cursor,
                    follow_latest: true,
                    viewport: ChartViewport::default(),
                });
                true
            }
            Err(err) => {
                warn!("Failed to open chart for {}: {}", symbol, err);
                false
            }
        }
    }

    /// Close the chart and drop its candle buffer; the period persists
    pub fn close(&mut self) {
        self.data = None;
    }

    /// Step the period with wraparound and reload
    ///
    /// Fetch-then-swap: on failure the period and buffer are untouched.
    pub async fn change_period(&mut self, forward: bool) -> bool {
        let new_period = if forward {
            self.period.next()
        } else {
            self.period.prev()
        };
        let Some(data) = &mut self.data else {
            self.period = new_period;
            return true;
        };
        match self.client.fetch_candles(&data.symbol, new_period).await {
            Ok(candles) => {
                self.period = new_period;
                data.candles = candles;
                data.cursor = match data.candles.len() {
                    0 => None,
                    len => Some(data.cursor.map_or(len - 1, |c| c.min(len - 1))),
                };
                true
            }
            Err(err) => {
                warn!(
                    "Period change to {} failed for {}: {}",
                    new_period.interval(),
                    data.symbol,
                    err
                );
                false
            }
        }
    }

    /// Move the cursor by `delta` candles, clamped to the buffer
    ///
    /// Follow-latest is cleared only when the cursor actually moves.
    pub fn move_cursor(&mut self, delta: i64) {
        let Some(data) = &mut self.data else { return };
        let Some(cursor) = data.cursor else { return };
        let last = data.candles.len() - 1;
        let target = if delta < 0 {
            cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            cursor.saturating_add(delta as usize).min(last)
        };
        if target != cursor {
            data.cursor = Some(target);
            data.follow_latest = false;
        }
    }

    /// Put the cursor on a specific candle (mouse pick)
    pub fn set_cursor(&mut self, index: usize) {
        let Some(data) = &mut self.data else { return };
        if index < data.candles.len() && data.cursor != Some(index) {
            data.cursor = Some(index);
            data.follow_latest = false;
        }
    }

    /// Toggle follow-latest; enabling it snaps to the newest candle
    pub fn toggle_follow(&mut self) {
        let Some(data) = &mut self.data else { return };
        data.follow_latest = !data.follow_latest;
        if data.follow_latest {
            data.cursor = data.candles.len().checked_sub(1);
        }
    }

    /// Keep the cursor on the newest candle while follow-latest is active
    pub fn enforce_follow(&mut self) {
        let Some(data) = &mut self.data else { return };
        if data.follow_latest && !data.candles.is_empty() {
            data.cursor = Some(data.candles.len() - 1);
        }
    }

    /// Reload once the newest candle's interval has rolled over
    ///
    /// Failures are silent; the stale buffer stays and the next frame
    /// tries again.
    pub async fn refresh_if_expired(&mut self) {
        let expired = match &self.data {
            Some(data) => match data.candles.last() {
                Some(last) => Utc::now().timestamp_millis() as u64 >= last.close_time_ms,
                None => false,
            },
            None => return,
        };
        if !expired {
            return;
        }
        debug!("Latest candle expired, reloading");
        let _ = self.reload_preserving_selection(false).await;
    }

    /// User-requested reload; false means the fetch failed
    pub async fn force_refresh(&mut self) -> bool {
        if self.data.is_none() {
            return true;
        }
        self.reload_preserving_selection(true).await
    }

    async fn reload_preserving_selection(&mut self, user_initiated: bool) -> bool {
        let Some(data) = &mut self.data else {
            return true;
        };
        let retained_ts = data
            .cursor
            .and_then(|c| data.candles.get(c))
            .map(|c| c.open_time_ms);
        let was_latest = match data.cursor {
            Some(c) => c + 1 == data.candles.len(),
            None => true,
        };
        let snap_to_latest = if user_initiated {
            data.follow_latest
        } else {
            was_latest
        };

        match self.client.fetch_candles(&data.symbol, self.period).await {
            Ok(candles) => {
                data.candles = candles;
                data.cursor = Self::reconcile_cursor(&data.candles, retained_ts, snap_to_latest);
                true
            }
            Err(err) => {
                warn!("Kline refresh failed for {}: {}", data.symbol, err);
                false
            }
        }
    }

    /// Choose the cursor after a reload: keep the previously selected open
    /// timestamp when it survived, otherwise snap to the newest candle
    fn reconcile_cursor(
        candles: &[Candle],
        retained_ts: Option<u64>,
        snap_to_latest: bool,
    ) -> Option<usize> {
        let last = candles.len().checked_sub(1)?;
        if snap_to_latest {
            return Some(last);
        }
        let Some(ts) = retained_ts else {
            return Some(last);
        };
        candles
            .iter()
            .position(|c| c.open_time_ms == ts)
            .or(Some(last))
    }

    /// Patch the newest candle with the board's live price
    ///
    /// Purely visual: never written back anywhere and fully overwritten by
    /// the next reload. Raw texts of touched fields are cleared so the
    /// renderer falls back to the numeric value.
    pub fn apply_live_price(&mut self) {
        let Some(data) = &mut self.data else { return };
        let price = match self.shared.live_price(data.symbol_index, &data.symbol) {
            Some(p) if p > 0.0 => p,
            _ => return,
        };
        let Some(last) = data.candles.last_mut() else {
            return;
        };
        if price > last.high {
            last.high = price;
            last.high_text = None;
        }
        if last.low == 0.0 || price < last.low {
            last.low = price;
            last.low_text = None;
        }
        last.close = price;
        last.close_text = None;
    }

    /// Recompute the visible candle window for this frame's geometry
    ///
    /// The window re-anchors to the newest candles when the geometry or
    /// candle count changes, then shifts just enough to keep the cursor
    /// visible.
    pub fn update_viewport(&mut self, origin_x: u16, stride: u16, visible: usize) {
        let Some(data) = &mut self.data else { return };
        let count = data.candles.len();
        let vp = &mut data.viewport;

        if vp.visible != visible || vp.count != count {
            vp.start_idx = count.saturating_sub(visible);
        }
        if let Some(cursor) = data.cursor {
            if cursor < vp.start_idx {
                vp.start_idx = cursor;
            } else if visible > 0 && cursor >= vp.start_idx + visible {
                vp.start_idx = cursor + 1 - visible;
            }
        }
        let max_start = count.saturating_sub(visible);
        if vp.start_idx > max_start {
            vp.start_idx = max_start;
        }

        vp.visible = visible;
        vp.stride = stride;
        vp.origin_x = origin_x;
        vp.count = count;
    }

    /// Map a screen column back to a candle index using the last rendered
    /// layout
    pub fn hit_test_index(&self, x: u16) -> Option<usize> {
        let data = self.data.as_ref()?;
        let vp = data.viewport;
        if vp.stride == 0 || x < vp.origin_x {
            return None;
        }
        let column = ((x - vp.origin_x) / vp.stride) as usize;
        if column >= vp.visible {
            return None;
        }
        let index = vp.start_idx + column;
        (index < data.candles.len()).then_some(index)
    }
}
