//! Terminal User Interface implementation
//!
//! Provides the price board and candlestick chart views using ratatui.

mod input;
mod render;

use std::io::{Stdout, Write, stdout};

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::AppResult;
use crate::app::ViewState;

pub use input::{handle_key_event, handle_mouse_event};
use render::{render_root, render_splash};

/// Actions generated from input handling
pub enum UiAction {
    None,
    QuitRequested,
    /// Open the chart for a configuration index
    OpenChart(usize),
    /// Step the chart period forward (true) or backward (false)
    ChangePeriod(bool),
    ForceRefresh,
}

/// RAII helper controlling the terminal lifecycle
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Create a new TUI terminal instance
    pub fn new() -> AppResult<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    /// Render the application
    pub fn draw(&mut self, view: &mut ViewState) -> AppResult<()> {
        self.terminal.draw(|frame| {
            render_root(frame, view);
        })?;
        Ok(())
    }

    /// Render the startup splash shown while the first fetch completes
    pub fn draw_splash(&mut self) -> AppResult<()> {
        self.terminal.draw(|frame| {
            render_splash(frame);
        })?;
        Ok(())
    }

    /// Restore terminal to canonical mode
    pub fn restore(&mut self) -> AppResult<()> {
        disable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Attempt to restore the terminal; ignore errors because we are in Drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = execute!(
            stdout,
            cursor::Show,
            LeaveAlternateScreen,
            DisableMouseCapture
        );
    }
}

/// Terminal bell for rejected interactions
pub fn beep() {
    let mut out = stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}
