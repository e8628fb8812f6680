//! CoinBoard Price Tracker Library
//!
//! A terminal dashboard for cryptocurrency trading pairs: a scrollable,
//! sortable price board and an interactive candlestick chart, refreshed
//! in the background from Binance's public REST API.

pub mod app;
pub mod binance;
pub mod board;
pub mod chart;
pub mod cli;
pub mod config;
pub mod market_data;
pub mod ui;

use anyhow::{Context, Result};

/// Application result type for consistent error handling
pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize tracing subscriber for logging
///
/// The TUI owns stdout, so log lines go to a daily-rolling file instead.
pub fn init_logging(level: &str, log_file: &str) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let path = std::path::Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "coinboard.log".into());

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, file_name);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("coinboard={}", level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false),
        )
        .init();

    Ok(())
}
