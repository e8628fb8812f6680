//! Market data types shared between the fetcher and the view engines

pub mod fetcher;
pub mod shared;

pub use fetcher::Fetcher;
pub use shared::SharedMarketState;

/// Latest 24h statistics for one trading pair
///
/// The `*_text` fields keep the exchange's original decimal strings so the
/// UI can show full precision regardless of f64 rounding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerRow {
    pub symbol: String,
    pub last_price: f64,
    pub change_percent: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub volume_base: f64,
    pub volume_quote: f64,
    pub trade_count: u64,
    /// Sample time in epoch milliseconds; zero until the first fetch lands
    pub updated_at_ms: u64,
    pub price_text: Option<String>,
    pub high_text: Option<String>,
    pub low_text: Option<String>,
}

impl TickerRow {
    /// Placeholder row carrying only the symbol, used to size the shared
    /// table before the first fetch completes
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Self::default()
        }
    }

    /// Whether at least one fetch has populated this row
    pub fn has_sample(&self) -> bool {
        self.updated_at_ms > 0
    }
}

/// One OHLCV interval of historical price data
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time_ms: u64,
    pub close_time_ms: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub quote_volume: f64,
    pub trade_count: u64,
    pub taker_buy_base: f64,
    pub taker_buy_quote: f64,
    /// Raw decimal strings; cleared field-by-field when the live price
    /// overlay rewrites the numeric value
    pub open_text: Option<String>,
    pub high_text: Option<String>,
    pub low_text: Option<String>,
    pub close_text: Option<String>,
}

impl Candle {
    /// Change over the interval in percent, zero when the open is degenerate
    pub fn change_percent(&self) -> f64 {
        if self.open != 0.0 {
            (self.close - self.open) / self.open * 100.0
        } else {
            0.0
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Candle interval selectable in the chart view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    OneMinute,
    FifteenMinutes,
    OneHour,
    FourHours,
    #[default]
    OneDay,
    OneWeek,
    OneMonth,
}

impl Period {
    /// All periods in cycling order, shortest first
    pub const ALL: [Period; 7] = [
        Period::OneMinute,
        Period::FifteenMinutes,
        Period::OneHour,
        Period::FourHours,
        Period::OneDay,
        Period::OneWeek,
        Period::OneMonth,
    ];

    /// Binance kline interval string
    pub fn interval(self) -> &'static str {
        match self {
            Period::OneMinute => "1m",
            Period::FifteenMinutes => "15m",
            Period::OneHour => "1h",
            Period::FourHours => "4h",
            Period::OneDay => "1d",
            Period::OneWeek => "1w",
            Period::OneMonth => "1M",
        }
    }

    /// Number of candles requested per reload
    pub fn limit(self) -> u32 {
        match self {
            Period::OneMinute => 240,
            Period::FifteenMinutes => 192,
            Period::OneHour => 168,
            Period::FourHours => 180,
            Period::OneDay => 120,
            Period::OneWeek => 104,
            Period::OneMonth => 120,
        }
    }

    /// User-facing label for title bars and footers
    pub fn label(self) -> &'static str {
        match self {
            Period::OneMinute => "1 MINUTE",
            Period::FifteenMinutes => "15 MINUTES",
            Period::OneHour => "1 HOUR",
            Period::FourHours => "4 HOURS",
            Period::OneDay => "1 DAY",
            Period::OneWeek => "1 WEEK",
            Period::OneMonth => "1 MONTH",
        }
    }

    /// Next longer interval, wrapping to the shortest
    pub fn next(self) -> Period {
        match self {
            Period::OneMinute => Period::FifteenMinutes,
            Period::FifteenMinutes => Period::OneHour,
            Period::OneHour => Period::FourHours,
            Period::FourHours => Period::OneDay,
            Period::OneDay => Period::OneWeek,
            Period::OneWeek => Period::OneMonth,
            Period::OneMonth => Period::OneMinute,
        }
    }

    /// Next shorter interval, wrapping to the longest
    pub fn prev(self) -> Period {
        match self {
            Period::OneMinute => Period::OneMonth,
            Period::FifteenMinutes => Period::OneMinute,
            Period::OneHour => Period::FifteenMinutes,
            Period::FourHours => Period::OneHour,
            Period::OneDay => Period::FourHours,
            Period::OneWeek => Period::OneDay,
            Period::OneMonth => Period::OneWeek,
        }
    }
}

/// Aggregate outcome of the most recent fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FetchStatus {
    Fetching = 0,
    Normal = 1,
    NetworkError = 2,
}

impl FetchStatus {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => FetchStatus::Fetching,
            2 => FetchStatus::NetworkError,
            _ => FetchStatus::Normal,
        }
    }

    /// Status panel label
    pub fn label(self) -> &'static str {
        match self {
            FetchStatus::Fetching => "FETCHING",
            FetchStatus::Normal => "NORMAL",
            FetchStatus::NetworkError => "NETWORK ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_cycle_wraps_both_directions() {
        assert_eq!(Period::OneMonth.next(), Period::OneMinute);
        assert_eq!(Period::OneMinute.prev(), Period::OneMonth);

        // next and prev are inverses across the whole cycle
        for period in Period::ALL {
            assert_eq!(period.next().prev(), period);
            assert_eq!(period.prev().next(), period);
        }
    }

    #[test]
    fn period_request_limits_match_intervals() {
        assert_eq!(Period::OneMinute.limit(), 240);
        assert_eq!(Period::FifteenMinutes.limit(), 192);
        assert_eq!(Period::OneHour.limit(), 168);
        assert_eq!(Period::FourHours.limit(), 180);
        assert_eq!(Period::OneDay.limit(), 120);
        assert_eq!(Period::OneWeek.limit(), 104);
        assert_eq!(Period::OneMonth.limit(), 120);
    }

    #[test]
    fn default_period_is_daily() {
        assert_eq!(Period::default(), Period::OneDay);
        assert_eq!(Period::default().interval(), "1d");
    }

    #[test]
    fn candle_change_percent_guards_zero_open() {
        let mut candle = Candle {
            open_time_ms: 0,
            close_time_ms: 0,
            open: 100.0,
            high: 110.0,
            low: 95.0,
            close: 105.0,
            volume: 0.0,
            quote_volume: 0.0,
            trade_count: 0,
            taker_buy_base: 0.0,
            taker_buy_quote: 0.0,
            open_text: None,
            high_text: None,
            low_text: None,
            close_text: None,
        };
        assert!((candle.change_percent() - 5.0).abs() < 1e-9);

        candle.open = 0.0;
        assert_eq!(candle.change_percent(), 0.0);
    }
}
