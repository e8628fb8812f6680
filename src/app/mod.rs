//! Application runtime
//!
//! Owns the shared market table, the background fetch task, and the
//! render/input loop that drives the price board and chart screens.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use tracing::{error, info, warn};

use crate::binance::BinanceRestClient;
use crate::board::PriceBoardEngine;
use crate::chart::ChartEngine;
use crate::config::Config;
use crate::market_data::{FetchStatus, Fetcher, SharedMarketState};
use crate::ui::tui::{Tui, UiAction, beep, handle_key_event, handle_mouse_event};
use crate::AppResult;

/// Which screen owns the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Board,
    Chart,
}

/// Everything the renderer and input handlers need for one frame
pub struct ViewState {
    pub board: PriceBoardEngine,
    pub chart: ChartEngine,
    pub highlight_price_moves: bool,
    shared: Arc<SharedMarketState>,
}

impl ViewState {
    fn new(
        shared: Arc<SharedMarketState>,
        client: BinanceRestClient,
        highlight_price_moves: bool,
    ) -> Self {
        Self {
            board: PriceBoardEngine::new(),
            chart: ChartEngine::new(shared.clone(), client),
            highlight_price_moves,
            shared,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.chart.is_open() {
            Mode::Chart
        } else {
            Mode::Board
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.shared.status()
    }

    /// Bring the active screen up to date before drawing a frame
    pub async fn pre_render(&mut self) {
        match self.mode() {
            Mode::Board => self.board.refresh(&self.shared),
            Mode::Chart => {
                self.chart.refresh_if_expired().await;
                self.chart.apply_live_price();
                self.chart.enforce_follow();
            }
        }
    }
}

/// Interactive application: background fetcher plus terminal UI
pub struct App {
    config: Config,
    shared: Arc<SharedMarketState>,
    client: BinanceRestClient,
    view: ViewState,
}

impl App {
    pub fn new(config: Config) -> Self {
        let shared = Arc::new(SharedMarketState::new(&config.symbols));
        let client = BinanceRestClient::new(
            config.binance.rest_url.clone(),
            config.binance.timeout_seconds,
        );
        let view = ViewState::new(
            shared.clone(),
            client.clone(),
            config.ui.highlight_price_moves,
        );

        Self {
            config,
            shared,
            client,
            view,
        }
    }

    /// Run until the user quits or Ctrl+C arrives
    pub async fn run(mut self) -> AppResult<()> {
        info!("Starting application runtime");

        let shutdown_state = self.shared.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
            info!("Ctrl+C received, initiating shutdown");
            shutdown_state.request_shutdown();
        });

        let mut tui = Tui::new()?;
        tui.draw_splash()?;

        // First fetch happens behind the splash screen so the board never
        // renders empty.
        let mut fetcher = Fetcher::new(
            self.shared.clone(),
            self.client.clone(),
            self.config.symbols.clone(),
            self.config.refresh_interval_secs,
        );
        fetcher.prime().await;
        let fetch_task = tokio::spawn(fetcher.run());

        let poll_interval = Duration::from_millis(self.config.ui.input_poll_ms);
        let run_result = self.run_ui_loop(&mut tui, poll_interval).await;

        self.shared.request_shutdown();
        match tokio::time::timeout(Duration::from_secs(15), fetch_task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Fetch task terminated with error: {}", e),
            Err(_) => warn!("Fetch task did not stop within 15s, abandoning it"),
        }

        tui.restore()?;
        info!("Shutdown completed");
        run_result
    }

    /// Main render/input loop
    async fn run_ui_loop(&mut self, tui: &mut Tui, poll_interval: Duration) -> AppResult<()> {
        while self.shared.is_running() {
            self.view.pre_render().await;
            tui.draw(&mut self.view)?;

            // Blocks for at most one poll interval, so fetcher updates
            // reach the screen even when the keyboard is idle.
            if event::poll(poll_interval)? {
                let action = match event::read()? {
                    Event::Key(key_event) => handle_key_event(&mut self.view, key_event),
                    Event::Mouse(mouse_event) => handle_mouse_event(&mut self.view, mouse_event),
                    _ => UiAction::None,
                };
                self.apply_action(action).await;
            }
        }

        Ok(())
    }

    async fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::None => {}
            UiAction::QuitRequested => {
                info!("Quit requested");
                self.shared.request_shutdown();
            }
            UiAction::OpenChart(symbol_index) => {
                if !self.view.chart.open(symbol_index).await {
                    beep();
                }
            }
            UiAction::ChangePeriod(forward) => {
                if !self.view.chart.change_period(forward).await {
                    beep();
                }
            }
            UiAction::ForceRefresh => {
                if !self.view.chart.force_refresh().await {
                    beep();
                }
            }
        }
    }
}
