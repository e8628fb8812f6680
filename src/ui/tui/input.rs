use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::UiAction;
use crate::app::{Mode, ViewState};
use crate::board::SortField;

/// Handle keyboard events, returning actions for the main loop
pub fn handle_key_event(view: &mut ViewState, key_event: KeyEvent) -> UiAction {
    if key_event.kind == KeyEventKind::Release {
        return UiAction::None;
    }

    // Global shortcuts first
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') | KeyCode::Char('d') = key_event.code {
            return UiAction::QuitRequested;
        }
    }

    match view.mode() {
        Mode::Board => handle_board_keys(view, key_event),
        Mode::Chart => handle_chart_keys(view, key_event),
    }
}

fn handle_board_keys(view: &mut ViewState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => UiAction::QuitRequested,
        KeyCode::Up => {
            view.board.select_previous();
            UiAction::None
        }
        KeyCode::Down => {
            view.board.select_next();
            UiAction::None
        }
        KeyCode::Enter => match view.board.resolve_symbol_index(view.board.selected()) {
            Some(symbol_index) => UiAction::OpenChart(symbol_index),
            None => UiAction::None,
        },
        KeyCode::F(5) => {
            view.board.cycle_sort(SortField::Price);
            UiAction::None
        }
        KeyCode::F(6) => {
            view.board.cycle_sort(SortField::Change);
            UiAction::None
        }
        _ => UiAction::None,
    }
}

fn handle_chart_keys(view: &mut ViewState, key_event: KeyEvent) -> UiAction {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            view.chart.close();
            UiAction::None
        }
        KeyCode::Up => UiAction::ChangePeriod(false),
        KeyCode::Down => UiAction::ChangePeriod(true),
        KeyCode::Left => {
            view.chart.move_cursor(-1);
            UiAction::None
        }
        KeyCode::Right => {
            view.chart.move_cursor(1);
            UiAction::None
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            view.chart.toggle_follow();
            UiAction::None
        }
        KeyCode::Char('r') | KeyCode::Char('R') => UiAction::ForceRefresh,
        _ => UiAction::None,
    }
}

/// Handle mouse events for the active view
pub fn handle_mouse_event(view: &mut ViewState, mouse_event: MouseEvent) -> UiAction {
    match view.mode() {
        Mode::Board => handle_board_mouse(view, mouse_event),
        Mode::Chart => handle_chart_mouse(view, mouse_event),
    }
}

fn handle_board_mouse(view: &mut ViewState, mouse_event: MouseEvent) -> UiAction {
    match mouse_event.kind {
        MouseEventKind::ScrollUp => {
            view.board.select_previous();
            UiAction::None
        }
        MouseEventKind::ScrollDown => {
            view.board.select_next();
            UiAction::None
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(row) = view.board.hit_test_row(mouse_event.row) else {
                return UiAction::None;
            };
            view.board.set_selected(row);
            match view.board.resolve_symbol_index(row) {
                Some(symbol_index) => UiAction::OpenChart(symbol_index),
                None => UiAction::None,
            }
        }
        _ => UiAction::None,
    }
}

fn handle_chart_mouse(view: &mut ViewState, mouse_event: MouseEvent) -> UiAction {
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Right) => {
            view.chart.close();
            UiAction::None
        }
        MouseEventKind::ScrollUp => UiAction::ChangePeriod(false),
        MouseEventKind::ScrollDown => UiAction::ChangePeriod(true),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = view.chart.hit_test_index(mouse_event.column) {
                view.chart.set_cursor(index);
            }
            UiAction::None
        }
        _ => UiAction::None,
    }
}
