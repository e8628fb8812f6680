use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::Frame;

use crate::app::ViewState;
use crate::market_data::{Candle, Period};
use crate::ui::format;

use super::put_str;

pub(super) const FOOTER_TEXT: &str = "KEYS: ←/→ CURSOR | ↑/↓: CHANGE INTERVAL | F: FOLLOW LATEST | R: REFRESH | LEFT CLICK: PICK CANDLE | RIGHT CLICK/ESC/Q: BACK";

const AXIS_WIDTH: u16 = 12;
const CANDLE_STRIDE: u16 = 2;
const PREFERRED_INFO_WIDTH: u16 = 37;
const MIN_INFO_WIDTH: u16 = 23;
const INFO_HEIGHT: u16 = 14;

pub(super) fn render_chart(frame: &mut Frame<'_>, area: Rect, view: &mut ViewState) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let period = view.chart.period();

    // Layout: title row, blank row, then the plot with a left price axis;
    // the time axis and its labels sit just above the footer.
    let plot_y = area.y + 2;
    let plot_height = area.height.saturating_sub(5).max(4);
    let axis_x = area.x + AXIS_WIDTH;
    let plot_x = axis_x + 2;
    let available_width = area.right().saturating_sub(plot_x + 2).max(1);

    // Reserve room for the candle detail box while the plot keeps the
    // majority of the width.
    let mut info_gap: u16 = 2;
    let mut info_width = PREFERRED_INFO_WIDTH.min(available_width * 2 / 3);
    if info_width < MIN_INFO_WIDTH {
        info_width = MIN_INFO_WIDTH;
    }
    if info_width + info_gap + 1 > available_width {
        info_width = available_width.saturating_sub(info_gap + 1);
    }
    if info_width < MIN_INFO_WIDTH {
        info_width = if available_width > MIN_INFO_WIDTH {
            MIN_INFO_WIDTH
        } else {
            available_width / 2
        };
    }
    if info_width < 10 {
        info_width = 0;
        info_gap = 0;
    }
    let plot_width = available_width.saturating_sub(info_width + info_gap).max(1);
    let mut info_x = (plot_x + plot_width + info_gap).max(area.right().saturating_sub(info_width));
    if info_x + info_width > area.right() {
        info_x = area.right().saturating_sub(info_width);
    }

    let visible = (plot_width / CANDLE_STRIDE).max(1) as usize;
    view.chart.update_viewport(plot_x, CANDLE_STRIDE, visible);

    let Some(data) = view.chart.data() else {
        return;
    };
    let vp = data.viewport();
    let candles = data.candles();

    {
        let buffer = frame.buffer_mut();
        render_title(buffer, area, data.symbol(), period);

        if candles.is_empty() {
            let msg = "No data available";
            let x = area.x + area.width.saturating_sub(msg.len() as u16) / 2;
            put_str(
                buffer,
                area,
                x,
                area.y + area.height / 2,
                msg,
                Style::default(),
            );
            return;
        }

        let window_end = (vp.start_idx + vp.visible).min(candles.len());
        let window = &candles[vp.start_idx..window_end];

        // The y-axis scales to the candles actually on screen.
        let mut min_price = window[0].low;
        let mut max_price = window[0].high;
        for candle in window {
            if candle.low < min_price {
                min_price = candle.low;
            }
            if candle.high > max_price {
                max_price = candle.high;
            }
        }
        if max_price - min_price < 0.000001 {
            min_price -= 1.0;
            max_price += 1.0;
        }
        let price_range = max_price - min_price;

        // Faint grid lines for price context.
        if plot_width > 2 && plot_height > 2 {
            let grid_style = Style::default().add_modifier(Modifier::DIM);
            for i in 1..4u16 {
                let y = plot_y + plot_height * i / 4;
                for x in plot_x..plot_x + plot_width {
                    if within(area, x, y) {
                        buffer.get_mut(x, y).set_style(grid_style).set_symbol("─");
                    }
                }
            }
            for i in 1..4u16 {
                let x = plot_x + plot_width * i / 4;
                for y in plot_y..plot_y + plot_height {
                    if within(area, x, y) {
                        buffer.get_mut(x, y).set_style(grid_style).set_symbol("│");
                    }
                }
            }
        }

        for y in plot_y..plot_y + plot_height {
            if within(area, axis_x, y) {
                buffer.get_mut(axis_x, y).set_symbol("│");
            }
        }

        // Y-axis labels with tick marks every 25% of the range.
        for i in 0..=4 {
            let price = max_price - price_range * i as f64 / 4.0;
            let label = format::format_axis_price(price, price_range);
            let y = price_to_row(price, min_price, max_price, plot_height, plot_y);
            put_str(
                buffer,
                area,
                area.x + 1,
                y,
                &format!("{:>10}", label),
                Style::default(),
            );
        }

        for (i, candle) in window.iter().enumerate() {
            let x = plot_x + i as u16 * CANDLE_STRIDE;
            let style = if candle.is_bullish() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };

            let open_y = price_to_row(candle.open, min_price, max_price, plot_height, plot_y);
            let close_y = price_to_row(candle.close, min_price, max_price, plot_height, plot_y);
            let high_y = price_to_row(candle.high, min_price, max_price, plot_height, plot_y);
            let low_y = price_to_row(candle.low, min_price, max_price, plot_height, plot_y);
            let top_y = open_y.min(close_y);
            let bottom_y = open_y.max(close_y);

            for y in high_y..=low_y {
                if within(area, x, y) {
                    buffer.get_mut(x, y).set_style(style).set_symbol("│");
                }
            }
            if top_y == bottom_y {
                if within(area, x, top_y) {
                    buffer.get_mut(x, top_y).set_style(style).set_symbol("─");
                }
            } else {
                for y in top_y..=bottom_y {
                    if within(area, x, y) {
                        buffer.get_mut(x, y).set_style(style).set_symbol("█");
                    }
                }
            }
        }

        // X-axis line and time labels below the plot.
        let axis_y = plot_y + plot_height;
        if axis_y + 1 < area.bottom() {
            for x in axis_x..plot_x + plot_width {
                if within(area, x, axis_y) {
                    buffer.get_mut(x, axis_y).set_symbol("─");
                }
            }
            if within(area, axis_x, axis_y) {
                buffer.get_mut(axis_x, axis_y).set_symbol("└");
            }

            let label_row = axis_y + 1;
            let arrow_row = axis_y - 1;
            let ticks = (plot_width / 12).clamp(3, 7);
            let step = if vp.visible > 1 {
                ((vp.visible - 1) / (ticks as usize - 1)).max(1)
            } else {
                1
            };
            let label_width = (plot_width / (ticks - 1)).max(6);
            let time_fmt = format::axis_label_format(period, label_width);
            for t in 0..ticks as usize {
                let col_idx = if t == ticks as usize - 1 {
                    vp.visible - 1
                } else {
                    t * step
                };
                let idx = vp.start_idx + col_idx;
                if idx >= candles.len() {
                    continue;
                }
                let x = plot_x + col_idx as u16 * CANDLE_STRIDE;
                let label = format::format_time_ms(candles[idx].open_time_ms, time_fmt);
                let max_x = plot_x + plot_width - 1;
                let label_x = x.saturating_sub(label.len() as u16 / 2).max(plot_x);
                if label_x > max_x {
                    continue;
                }
                let clipped: String = label.chars().take((max_x - label_x + 1) as usize).collect();
                put_str(buffer, area, label_x, label_row, &clipped, Style::default());
                if arrow_row >= plot_y && within(area, x, arrow_row) {
                    buffer.get_mut(x, arrow_row).set_symbol("↑");
                }
            }
        }

        // Dashed vertical marker on the selected candle.
        if let Some(cursor) = data.cursor() {
            if cursor >= vp.start_idx && cursor < window_end {
                let candle = &candles[cursor];
                let x = plot_x + (cursor - vp.start_idx) as u16 * CANDLE_STRIDE;
                let high_y = price_to_row(candle.high, min_price, max_price, plot_height, plot_y);
                let low_y = price_to_row(candle.low, min_price, max_price, plot_height, plot_y);
                let line_bottom = axis_y.saturating_sub(2);
                let dim = Style::default().add_modifier(Modifier::DIM);
                for y in plot_y..=line_bottom {
                    if (y - plot_y) % 2 != 0 {
                        continue; // dashed: every other row
                    }
                    if y >= high_y && y <= low_y {
                        continue; // keep the candle itself visible
                    }
                    if within(area, x, y) {
                        buffer.get_mut(x, y).set_style(dim).set_symbol("│");
                    }
                }
            }
        }
    }

    // The detail box mirrors the selected candle; the price box below it
    // tracks the newest close.
    let max_info_height = area.height.saturating_sub(3);
    if info_width >= 10 && max_info_height >= INFO_HEIGHT {
        if let Some(candle) = data.cursor_candle() {
            let rect = Rect {
                x: info_x,
                y: area.y + 2,
                width: info_width,
                height: INFO_HEIGHT,
            };
            render_info_box(frame, rect, candle);
        }
    }
    if info_width >= 10 {
        if let Some(latest) = candles.last() {
            let price_box_y = area.y + 2 + INFO_HEIGHT + 1;
            let max_height = area
                .bottom()
                .saturating_sub(1)
                .saturating_sub(price_box_y);
            let height = 5u16.min(max_height);
            if height >= 4 {
                let rect = Rect {
                    x: info_x,
                    y: price_box_y,
                    width: info_width,
                    height,
                };
                render_price_box(frame, rect, latest);
            }
        }
    }
}

fn render_title(buffer: &mut Buffer, area: Rect, symbol: &str, period: Period) {
    let style = Style::default().fg(Color::Black).bg(Color::White);
    for x in area.left()..area.right() {
        buffer.get_mut(x, area.y).set_style(style).set_symbol(" ");
    }
    let header = format!("{} - {} CANDLESTICK CHART", symbol, period.label());
    let x = area.x + area.width.saturating_sub(header.len() as u16) / 2;
    put_str(buffer, area, x, area.y, &header, style);
}

// Convert a price into a row on the plot grid.
fn price_to_row(price: f64, min_price: f64, max_price: f64, plot_height: u16, plot_y: u16) -> u16 {
    let mut range = max_price - min_price;
    if range <= 0.000_000_1 {
        range = 1.0;
    }
    let normalized = ((price - min_price) / range).clamp(0.0, 1.0);
    let usable = plot_height.saturating_sub(1).max(1);
    plot_y + plot_height - 1 - (normalized * usable as f64) as u16
}

fn within(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

fn render_info_box(frame: &mut Frame<'_>, rect: Rect, candle: &Candle) {
    let box_style = Style::default().fg(Color::Black).bg(Color::White);

    let open = format::format_price(candle.open_text.as_ref(), candle.open);
    let high = format::format_price(candle.high_text.as_ref(), candle.high);
    let low = format::format_price(candle.low_text.as_ref(), candle.low);
    let close = format::format_price(candle.close_text.as_ref(), candle.close);
    let change_style = if candle.is_bullish() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(format!(
            "Open Time : {}",
            format::format_time_ms(candle.open_time_ms, "%Y-%m-%d %H:%M")
        )),
        Line::from(format!(
            "Close Time: {}",
            format::format_time_ms(candle.close_time_ms, "%Y-%m-%d %H:%M")
        )),
        Line::styled(
            format!("Open : {}", open),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("High : {}", high),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("Low  : {}", low),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("Close: {}", close),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Line::from(format!("Vol  : {}", format::format_number(candle.volume))),
        Line::from(format!(
            "Quote Vol: {}",
            format::format_number(candle.quote_volume)
        )),
        Line::from(format!("Trades   : {}", candle.trade_count)),
        Line::from(format!(
            "Taker Buy (B): {}",
            format::format_number(candle.taker_buy_base)
        )),
        Line::from(format!(
            "Taker Buy (Q): {}",
            format::format_number(candle.taker_buy_quote)
        )),
        Line::styled(format!("Change: {:+.2}%", candle.change_percent()), change_style),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(1, 1, 0, 0))
        .style(box_style);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

fn render_price_box(frame: &mut Frame<'_>, rect: Rect, latest: &Candle) {
    let box_style = Style::default().fg(Color::Black).bg(Color::White);
    let price = format::format_price(latest.close_text.as_ref(), latest.close);
    let lines = vec![
        Line::from("Current Price:"),
        Line::styled(price, Style::default().add_modifier(Modifier::BOLD)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(1, 1, 0, 0))
        .style(box_style);
    frame.render_widget(Paragraph::new(lines).block(block), rect);
}
