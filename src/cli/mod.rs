//! Command Line Interface module
//!
//! Implements argument parsing for CoinBoard.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "coinboard")]
#[command(about = "CoinBoard Price Tracker")]
#[command(long_about = "A terminal dashboard for cryptocurrency trading pairs")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, default_value = "coinboard.toml")]
    pub config_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Comma-separated symbol list overriding the configuration file
    #[arg(long)]
    pub symbols: Option<String>,

    /// Dry-run mode: show resolved configuration without starting the UI
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Adjust log level based on verbose flag
    pub fn effective_log_level(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level.clone()
        }
    }

    /// Symbols passed on the command line, split and cleaned
    pub fn symbol_overrides(&self) -> Option<Vec<String>> {
        self.symbols.as_ref().map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    /// Check if we're running in dry-run mode
    pub fn is_dry_run_mode(&self) -> bool {
        self.dry_run
    }
}
