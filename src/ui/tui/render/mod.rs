mod board;
mod chart;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::app::{Mode, ViewState};
use crate::market_data::FetchStatus;

use self::board::render_board;
use self::chart::render_chart;

pub(super) fn render_root(frame: &mut Frame<'_>, view: &mut ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(frame.size());

    let footer_text = match view.mode() {
        Mode::Board => board::footer_text(view),
        Mode::Chart => chart::FOOTER_TEXT.to_string(),
    };
    let status = view.status();

    match view.mode() {
        Mode::Board => render_board(frame, chunks[0], view),
        Mode::Chart => render_chart(frame, chunks[0], view),
    }

    render_footer(frame, chunks[1], &footer_text, status);
}

/// Footer bar: interaction hints on the left, fetch status panel on the right
fn render_footer(frame: &mut Frame<'_>, area: Rect, text: &str, status: FetchStatus) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let panel_width = (area.width / 10).max(12).min(area.width);
    let hint_width = area.width - panel_width;

    let hint_area = Rect {
        width: hint_width,
        ..area
    };
    let panel_area = Rect {
        x: area.x + hint_width,
        width: panel_width,
        ..area
    };

    frame.render_widget(
        Paragraph::new(format!(" {}", text))
            .style(Style::default().fg(Color::Black).bg(Color::Gray)),
        hint_area,
    );

    let panel_style = match status {
        FetchStatus::Fetching => Style::default().fg(Color::White).bg(Color::Blue),
        FetchStatus::Normal => Style::default().fg(Color::White).bg(Color::Green),
        FetchStatus::NetworkError => Style::default().fg(Color::Yellow).bg(Color::Red),
    };
    frame.render_widget(
        Paragraph::new(status.label())
            .alignment(Alignment::Center)
            .style(panel_style.add_modifier(Modifier::BOLD)),
        panel_area,
    );
}

const SPLASH_ART: [&str; 6] = [
    "  _____         _         ____                           _ ",
    " / ____|       (_)       |  _ \\                         | |",
    "| |       ___   _  _ __  | |_) |  ___    __ _  _ __   __| |",
    "| |      / _ \\ | || '_ \\ |  _ <  / _ \\  / _` || '__| / _` |",
    "| |____ | (_) || || | | || |_) || (_) || (_| || |   | (_| |",
    " \\_____| \\___/ |_||_| |_||____/  \\___/  \\__,_||_|    \\__,_|",
];

/// Startup splash drawn once before the first fetch completes
pub(super) fn render_splash(frame: &mut Frame<'_>) {
    let area = frame.size();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let art_width = SPLASH_ART
        .iter()
        .map(|line| line.len() as u16)
        .max()
        .unwrap_or(0);
    let total_lines = SPLASH_ART.len() as u16 + 4;
    let start_y = area.height.saturating_sub(total_lines) / 2;
    let start_x = area.width.saturating_sub(art_width) / 2;

    let buffer = frame.buffer_mut();
    let art_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut y = start_y;
    for line in SPLASH_ART {
        put_str(buffer, area, start_x, y, line, art_style);
        y += 1;
    }

    y += 1;
    let loading = "LOADING...";
    let x = area.width.saturating_sub(loading.len() as u16) / 2;
    put_str(
        buffer,
        area,
        x,
        y,
        loading,
        Style::default().add_modifier(Modifier::BOLD),
    );

    y += 1;
    let source = "FETCHING DATA FROM BINANCE API";
    let x = area.width.saturating_sub(source.len() as u16) / 2;
    put_str(buffer, area, x, y, source, Style::default());
}

// Clip-checked string write; Buffer::set_string panics outside the buffer.
fn put_str(buffer: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if x < area.left() || x >= area.right() || y < area.top() || y >= area.bottom() {
        return;
    }
    buffer.set_string(x, y, text, style);
}
