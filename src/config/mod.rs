//! Configuration management module
//!
//! Handles loading, validation, and management of application configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Hard cap on tracked symbols; the shared market table is sized once at
/// startup and never grows.
pub const MAX_SYMBOLS: usize = 50;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// List of trading symbols to track, in display order
    pub symbols: Vec<String>,

    /// Seconds between background refresh cycles
    pub refresh_interval_secs: u64,

    /// Logging level
    pub log_level: String,

    /// File-based logging configuration
    pub log: LogConfig,

    /// Binance-specific configuration
    pub binance: BinanceConfig,

    /// UI-specific configuration
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BinanceConfig {
    /// REST API base URL
    pub rest_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Milliseconds the render loop waits for an input event per frame
    pub input_poll_ms: u64,

    /// Highlight board rows whose price moved since the previous frame
    pub highlight_price_moves: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Absolute or relative path to the rolling log file
    pub file_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec![
                "BTCUSDT".to_string(),
                "ETHUSDT".to_string(),
                "BNBUSDT".to_string(),
            ],
            refresh_interval_secs: 5,
            log_level: "info".to_string(),
            log: LogConfig::default(),
            binance: BinanceConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            rest_url: "https://api.binance.com".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            input_poll_ms: 1000,
            highlight_price_moves: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: "logs/coinboard.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        // COINBOARD_SYMBOLS - comma-separated list of symbols
        if let Ok(symbols) = env::var("COINBOARD_SYMBOLS") {
            self.symbols = symbols
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // COINBOARD_REFRESH_INTERVAL_SECS - background refresh cadence
        if let Ok(interval) = env::var("COINBOARD_REFRESH_INTERVAL_SECS") {
            if let Ok(value) = interval.parse::<u64>() {
                self.refresh_interval_secs = value;
            }
        }

        // COINBOARD_LOG_LEVEL - logging level
        if let Ok(log_level) = env::var("COINBOARD_LOG_LEVEL") {
            self.log_level = log_level;
        }

        // COINBOARD_LOG_FILE_PATH - logging destination file
        if let Ok(file_path) = env::var("COINBOARD_LOG_FILE_PATH") {
            if !file_path.trim().is_empty() {
                self.log.file_path = file_path;
            }
        }

        // COINBOARD_BINANCE_REST_URL - REST API URL
        if let Ok(rest_url) = env::var("COINBOARD_BINANCE_REST_URL") {
            self.binance.rest_url = rest_url;
        }

        // COINBOARD_BINANCE_TIMEOUT_SECONDS - request timeout
        if let Ok(timeout) = env::var("COINBOARD_BINANCE_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.binance.timeout_seconds = value;
            }
        }

        // COINBOARD_UI_INPUT_POLL_MS - input poll timeout
        if let Ok(poll) = env::var("COINBOARD_UI_INPUT_POLL_MS") {
            if let Ok(value) = poll.parse::<u64>() {
                self.ui.input_poll_ms = value.max(1);
            }
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_else(|err| {
            tracing::warn!("Failed to load config: {}, using defaults", err);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("At least one symbol must be specified");
        }

        if self.symbols.len() > MAX_SYMBOLS {
            anyhow::bail!(
                "Too many symbols: {} (maximum is {})",
                self.symbols.len(),
                MAX_SYMBOLS
            );
        }

        if self.refresh_interval_secs == 0 {
            anyhow::bail!("Refresh interval must be greater than 0");
        }

        if self.binance.timeout_seconds == 0 {
            anyhow::bail!("Timeout must be greater than 0");
        }

        if self.log.file_path.trim().is_empty() {
            anyhow::bail!("Log file path must not be empty");
        }

        if self.ui.input_poll_ms == 0 {
            anyhow::bail!("ui.input_poll_ms must be greater than 0");
        }

        // Validate symbol format (basic check)
        for symbol in &self.symbols {
            if symbol.is_empty() || symbol.len() < 3 {
                anyhow::bail!("Invalid symbol format: {}", symbol);
            }
        }

        Ok(())
    }

    /// Normalize symbol format for Binance API
    pub fn normalize_symbol(symbol: &str) -> String {
        // Convert BTC-USDT to BTCUSDT format
        symbol.replace('-', "").to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.symbols, vec!["BTCUSDT", "ETHUSDT", "BNBUSDT"]);
        assert_eq!(config.refresh_interval_secs, 5);
    }

    #[test]
    fn test_symbol_normalization() {
        assert_eq!(Config::normalize_symbol("BTC-USDT"), "BTCUSDT");
        assert_eq!(Config::normalize_symbol("btc-usdt"), "BTCUSDT");
        assert_eq!(Config::normalize_symbol("ETHUSDT"), "ETHUSDT");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.symbols, deserialized.symbols);
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        // Test save
        config.save_to_file(temp_file.path()).unwrap();

        // Test load
        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.symbols, loaded_config.symbols);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "symbols = [\"SOLUSDT\"]\n").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.symbols, vec!["SOLUSDT"]);
        assert_eq!(config.refresh_interval_secs, 5);
        assert_eq!(config.binance.rest_url, "https://api.binance.com");
    }

    #[test]
    fn test_validate_rejects_oversized_symbol_list() {
        let mut config = Config::default();
        config.symbols = (0..=MAX_SYMBOLS).map(|i| format!("SYM{:03}USDT", i)).collect();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_symbol_list() {
        let mut config = Config::default();
        config.symbols.clear();
        assert!(config.validate().is_err());
    }
}
