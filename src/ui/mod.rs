//! User interface layer
//!
//! Startup overview output plus the interactive terminal UI.

pub mod format;
pub mod tui;

use colored::Colorize;

use crate::config::Config;

/// Print a boxed configuration overview for dry-run mode
pub fn display_config_overview(config: &Config) {
    println!();
    println!("┌─ Configuration Overview ───────────────────────────────────────────┐");
    println!("│   {:<64} │", "");
    println!(
        "│   {} │",
        format!("{:<64}", "Configuration loaded successfully!").green()
    );
    println!("│   {:<64} │", "");
    println!("│   {:<64} │", format!("Symbols: {}", config.symbols.join(", ")));
    println!(
        "│   {:<64} │",
        format!("Refresh interval: {}s", config.refresh_interval_secs)
    );
    println!("│   {:<64} │", format!("Log level: {}", config.log_level));
    println!("│   {:<64} │", format!("Log file: {}", config.log.file_path));
    println!("│   {:<64} │", "");
    println!("│   {} │", format!("{:<64}", "Binance API:").cyan());
    println!(
        "│   {:<64} │",
        format!("• REST API: {}", config.binance.rest_url)
    );
    println!(
        "│   {:<64} │",
        format!("• Timeout: {}s", config.binance.timeout_seconds)
    );
    println!("│   {:<64} │", "");
    println!("│   {} │", format!("{:<64}", "UI Settings:").cyan());
    println!(
        "│   {:<64} │",
        format!("• Input poll: {}ms", config.ui.input_poll_ms)
    );
    println!(
        "│   {:<64} │",
        format!(
            "• Price move highlight: {}",
            if config.ui.highlight_price_moves {
                "enabled"
            } else {
                "disabled"
            }
        )
    );
    println!("│   {:<64} │", "");
    println!("└────────────────────────────────────────────────────────────────────┘");
    println!();
}
