use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::Frame;

use crate::app::ViewState;
use crate::board::{PriceMove, SortField};
use crate::market_data::TickerRow;
use crate::ui::format;

use super::put_str;

// Column anchors for the price board layout.
const SYMBOL_COL: u16 = 2;
const PRICE_COL: u16 = 18;
const CHANGE_COL: u16 = 35;
const HIGH_COL: u16 = 52;
const LOW_COL: u16 = 70;
const VOLUME_COL: u16 = 88;
const TRADES_COL: u16 = 108;
const QUOTE_COL: u16 = 126;

/// Column visibility is responsive: narrow terminals drop the rightmost
/// columns first
#[derive(Clone, Copy)]
struct VisibleColumns {
    high: bool,
    low: bool,
    volume: bool,
    trades: bool,
    quote: bool,
}

impl VisibleColumns {
    fn for_width(width: u16) -> Self {
        Self {
            high: width > HIGH_COL + 10,
            low: width > LOW_COL + 10,
            volume: width > VOLUME_COL + 12,
            trades: width > TRADES_COL + 6,
            quote: width > QUOTE_COL + 12,
        }
    }
}

pub(super) fn render_board(frame: &mut Frame<'_>, area: Rect, view: &mut ViewState) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    // Layout: row 0 title, row 2 headers, row 3 separator, rows 4.. list.
    let list_top = area.y + 4;
    let visible_rows = area.bottom().saturating_sub(list_top) as usize;
    view.board.record_list_geometry(list_top, visible_rows);

    let board = &view.board;
    let highlight_moves = view.highlight_price_moves;
    let columns = VisibleColumns::for_width(area.width);
    let buffer = frame.buffer_mut();

    render_title_bar(buffer, area);

    let header_y = area.y + 2;
    let header_style = Style::default().fg(Color::Cyan);
    put_str(
        buffer,
        area,
        area.x + SYMBOL_COL,
        header_y,
        &format!("{:<15}", "SYMBOL"),
        header_style,
    );
    put_str(
        buffer,
        area,
        area.x + PRICE_COL,
        header_y,
        &format!("{:>15}", "PRICE"),
        header_style,
    );
    put_str(
        buffer,
        area,
        area.x + CHANGE_COL,
        header_y,
        &format!("{:>15}", "CHANGE 24H"),
        header_style,
    );
    if columns.high {
        put_str(
            buffer,
            area,
            area.x + HIGH_COL,
            header_y,
            &format!("{:>12}", "HIGH"),
            header_style,
        );
    }
    if columns.low {
        put_str(
            buffer,
            area,
            area.x + LOW_COL,
            header_y,
            &format!("{:>12}", "LOW"),
            header_style,
        );
    }
    if columns.volume {
        put_str(
            buffer,
            area,
            area.x + VOLUME_COL,
            header_y,
            &format!("{:>14}", "VOLUME"),
            header_style,
        );
    }
    if columns.trades {
        put_str(
            buffer,
            area,
            area.x + TRADES_COL,
            header_y,
            &format!("{:>10}", "TRADES"),
            header_style,
        );
    }
    if columns.quote {
        put_str(
            buffer,
            area,
            area.x + QUOTE_COL,
            header_y,
            &format!("{:>14}", "QUOTE VOL"),
            header_style,
        );
    }
    if area.width > 4 {
        put_str(
            buffer,
            area,
            area.x + 2,
            area.y + 3,
            &"─".repeat(area.width as usize - 4),
            Style::default(),
        );
    }

    let rows = board.rows();
    let offset = board.scroll_offset();
    let end = (offset + visible_rows).min(rows.len());
    for display_row in offset..end {
        let y = list_top + (display_row - offset) as u16;
        let price_move = if highlight_moves {
            board.move_at(display_row)
        } else {
            PriceMove::Steady
        };
        render_row(
            buffer,
            area,
            y,
            &rows[display_row],
            display_row == board.selected(),
            price_move,
            columns,
        );
    }

    // Scroll indicators in the left gutter.
    if visible_rows > 0 {
        let arrow_style = Style::default().fg(Color::Cyan);
        if offset > 0 {
            put_str(buffer, area, area.x, list_top, "▲", arrow_style);
        }
        if offset + visible_rows < rows.len() {
            put_str(
                buffer,
                area,
                area.x,
                list_top + visible_rows as u16 - 1,
                "▼",
                arrow_style,
            );
        }
    }
}

// Title bar: left label, centered board name, right clock on one band.
fn render_title_bar(buffer: &mut Buffer, area: Rect) {
    let style = Style::default().fg(Color::Black).bg(Color::White);
    for x in area.left()..area.right() {
        buffer.get_mut(x, area.y).set_style(style).set_symbol(" ");
    }

    let left_text = "COINBOARD";
    let title_text = "[P][R][I][C][E] [B][O][A][R][D]";
    let clock = format::format_clock();

    let left_x = area.x + 2;
    let time_x = area
        .right()
        .saturating_sub(clock.len() as u16 + 2)
        .max(left_x);
    let mut title_x = area.x + area.width.saturating_sub(title_text.len() as u16) / 2;
    let min_title_x = left_x + left_text.len() as u16 + 2;
    if title_x < min_title_x {
        title_x = min_title_x;
    }
    if title_x + title_text.len() as u16 >= time_x {
        title_x = time_x
            .saturating_sub(title_text.len() as u16 + 1)
            .max(left_x);
    }

    put_str(buffer, area, left_x, area.y, left_text, style);
    put_str(buffer, area, title_x, area.y, title_text, style);
    put_str(buffer, area, time_x, area.y, &clock, style);
}

fn render_row(
    buffer: &mut Buffer,
    area: Rect,
    y: u16,
    row: &TickerRow,
    selected: bool,
    price_move: PriceMove,
    columns: VisibleColumns,
) {
    if y >= area.bottom() {
        return;
    }

    let base = if selected {
        let style = Style::default().fg(Color::Black).bg(Color::Blue);
        for x in area.left()..area.right() {
            buffer.get_mut(x, y).set_style(style).set_symbol(" ");
        }
        style
    } else {
        Style::default()
    };

    let symbol_style = if selected {
        Style::default().fg(Color::Yellow).bg(Color::Blue)
    } else {
        Style::default().fg(Color::Yellow)
    }
    .add_modifier(Modifier::BOLD);
    put_str(
        buffer,
        area,
        area.x + SYMBOL_COL,
        y,
        &format!("{:<15}", row.symbol),
        symbol_style,
    );

    // Price cell: arrow plus value, colored by the 24h direction. A fresh
    // move inverts the cell for one frame.
    let daily_color = if row.change_percent >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    let price_style = match price_move {
        PriceMove::Up => Style::default().fg(Color::Black).bg(Color::Green),
        PriceMove::Down => Style::default().fg(Color::Black).bg(Color::Red),
        PriceMove::Steady if selected => Style::default().fg(daily_color).bg(Color::Blue),
        PriceMove::Steady => Style::default().fg(daily_color),
    }
    .add_modifier(Modifier::BOLD);
    let arrow = match price_move {
        PriceMove::Up => "↑",
        PriceMove::Down => "↓",
        PriceMove::Steady => " ",
    };
    let price = format::format_price(row.price_text.as_ref(), row.last_price);
    put_str(buffer, area, area.x + PRICE_COL, y, arrow, price_style);
    put_str(
        buffer,
        area,
        area.x + PRICE_COL + 1,
        y,
        &format!("{:>14}", price),
        price_style,
    );

    let change_style = if selected {
        Style::default().fg(daily_color).bg(Color::Blue)
    } else {
        Style::default().fg(daily_color)
    }
    .add_modifier(Modifier::BOLD);
    put_str(
        buffer,
        area,
        area.x + CHANGE_COL,
        y,
        &format!("{:>15}", format!("{:+.2}%", row.change_percent)),
        change_style,
    );

    if columns.high {
        let high = format::format_price(row.high_text.as_ref(), row.high_24h);
        put_str(
            buffer,
            area,
            area.x + HIGH_COL,
            y,
            &format!("{:>12}", high),
            base,
        );
    }
    if columns.low {
        let low = format::format_price(row.low_text.as_ref(), row.low_24h);
        put_str(
            buffer,
            area,
            area.x + LOW_COL,
            y,
            &format!("{:>12}", low),
            base,
        );
    }
    if columns.volume {
        put_str(
            buffer,
            area,
            area.x + VOLUME_COL,
            y,
            &format!("{:>14}", format::format_grouped(row.volume_base)),
            base,
        );
    }
    if columns.trades {
        put_str(
            buffer,
            area,
            area.x + TRADES_COL,
            y,
            &format!("{:>10}", format::format_count(row.trade_count)),
            base,
        );
    }
    if columns.quote {
        put_str(
            buffer,
            area,
            area.x + QUOTE_COL,
            y,
            &format!("{:>14}", format::format_grouped(row.volume_quote)),
            base,
        );
    }
}

pub(super) fn footer_text(view: &ViewState) -> String {
    format!(
        "KEYS: ↑/↓ NAVIGATE | ENTER/CLICK: VIEW CHART | F5: SORT BY PRICE {} | F6: SORT BY CHANGE {} | Q: QUIT",
        view.board.next_sort_hint(SortField::Price),
        view.board.next_sort_hint(SortField::Change)
    )
}
