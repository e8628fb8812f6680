use coinboard::{AppResult, app::App, cli::Cli, config::Config, init_logging, ui};

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse_args();

    // Load configuration
    let mut config = Config::load_or_default(&cli.config_file);
    if let Some(symbols) = cli.symbol_overrides() {
        config.symbols = symbols
            .iter()
            .map(|s| Config::normalize_symbol(s))
            .collect();
    }

    // Initialize logging
    init_logging(&cli.effective_log_level(), &config.log.file_path)?;

    tracing::info!("CoinBoard starting...");
    tracing::debug!("CLI arguments: {:?}", cli);

    config.validate()?;

    if cli.is_dry_run_mode() {
        ui::display_config_overview(&config);
        return Ok(());
    }

    App::new(config).run().await
}
