//! Price board view state
//!
//! Takes consistent snapshots of the shared market table, applies the
//! active sort, maintains selection and a persistent scroll window, and
//! maps screen positions back to configured symbols.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

use crate::market_data::{SharedMarketState, TickerRow};

/// Sortable columns on the price board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

/// Active sort configuration; no field keeps configured order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

/// Price movement of a display row since the previous frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceMove {
    #[default]
    Steady,
    Up,
    Down,
}

/// Board engine state
///
/// `order` is always a permutation of `[0, count)` mapping display row to
/// configuration index; rows and order entries are swapped together so the
/// mapping survives sorting.
pub struct PriceBoardEngine {
    snapshot: Vec<TickerRow>,
    order: Vec<usize>,
    sort: SortState,
    selected: usize,
    scroll_offset: usize,
    last_prices: Vec<f64>,
    moves: Vec<PriceMove>,
    list_top: u16,
    visible_rows: usize,
}

impl PriceBoardEngine {
    pub fn new() -> Self {
        Self {
            snapshot: Vec::new(),
            order: Vec::new(),
            sort: SortState::default(),
            selected: 0,
            scroll_offset: 0,
            last_prices: Vec::new(),
            moves: Vec::new(),
            list_top: 0,
            visible_rows: 0,
        }
    }

    /// Snapshot the shared table and rebuild display order for this frame
    pub fn refresh(&mut self, shared: &SharedMarketState) {
        shared.snapshot_into(&mut self.snapshot);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let count = self.snapshot.len();
        self.order.clear();
        self.order.extend(0..count);
        self.apply_sort();
        self.track_moves();
        self.clamp_selected();
    }

    /// Stable insertion sort over the snapshot; ties keep configured order
    /// under both directions
    fn apply_sort(&mut self) {
        let Some(field) = self.sort.field else { return };
        let count = self.snapshot.len();
        if count <= 1 {
            return;
        }
        let descending = self.sort.direction == SortDirection::Descending;
        for i in 1..count {
            let mut j = i;
            while j > 0
                && Self::row_after(
                    &self.snapshot[j - 1],
                    self.order[j - 1],
                    &self.snapshot[j],
                    self.order[j],
                    field,
                    descending,
                )
            {
                self.snapshot.swap(j - 1, j);
                self.order.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    /// True when row `a` must appear below row `b` on the board
    fn row_after(
        a: &TickerRow,
        a_origin: usize,
        b: &TickerRow,
        b_origin: usize,
        field: SortField,
        descending: bool,
    ) -> bool {
        let key_a = OrderedFloat(Self::sort_key(a, field));
        let key_b = OrderedFloat(Self::sort_key(b, field));
        let by_field = if descending {
            key_b.cmp(&key_a)
        } else {
            key_a.cmp(&key_b)
        };
        match by_field {
            Ordering::Equal => a_origin > b_origin,
            ordering => ordering == Ordering::Greater,
        }
    }

    fn sort_key(row: &TickerRow, field: SortField) -> f64 {
        match field {
            SortField::Price => row.last_price,
            SortField::Change => row.change_percent,
        }
    }

    /// Record per-symbol price movement versus the previous frame
    fn track_moves(&mut self) {
        let count = self.snapshot.len();
        self.last_prices.resize(count, 0.0);
        self.moves.clear();
        self.moves.resize(count, PriceMove::Steady);

        for (display_row, row) in self.snapshot.iter().enumerate() {
            let origin = self.order[display_row];
            let previous = self.last_prices[origin];
            if previous != 0.0 && (row.last_price - previous).abs() > 1e-9 {
                self.moves[display_row] = if row.last_price > previous {
                    PriceMove::Up
                } else {
                    PriceMove::Down
                };
            }
            self.last_prices[origin] = row.last_price;
        }
    }

    /// Cycle a sort field: inactive -> descending -> ascending -> inactive
    pub fn cycle_sort(&mut self, field: SortField) {
        match self.sort.field {
            Some(active) if active == field => match self.sort.direction {
                SortDirection::Descending => self.sort.direction = SortDirection::Ascending,
                SortDirection::Ascending => self.sort = SortState::default(),
            },
            _ => {
                self.sort = SortState {
                    field: Some(field),
                    direction: SortDirection::Descending,
                };
            }
        }
    }

    /// Footer hint for what pressing the sort key does next
    pub fn next_sort_hint(&self, field: SortField) -> &'static str {
        match self.sort.field {
            Some(active) if active == field => match self.sort.direction {
                SortDirection::Descending => "↑",
                SortDirection::Ascending => "=",
            },
            _ => "↓",
        }
    }

    pub fn clamp_selected(&mut self) {
        let count = self.snapshot.len();
        if count == 0 {
            self.selected = 0;
        } else if self.selected >= count {
            self.selected = count - 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        self.selected += 1;
        self.clamp_selected();
    }

    /// Select a display row directly; out-of-range rows are ignored
    pub fn set_selected(&mut self, display_row: usize) -> bool {
        if display_row < self.snapshot.len() {
            self.selected = display_row;
            true
        } else {
            false
        }
    }

    /// Record this frame's list geometry and keep the selection visible
    ///
    /// The scroll offset persists across frames; it only moves when the
    /// selection leaves the window or the window shrinks past it.
    pub fn record_list_geometry(&mut self, list_top: u16, visible_rows: usize) {
        self.list_top = list_top;
        self.visible_rows = visible_rows;

        let count = self.snapshot.len();
        if visible_rows == 0 || count == 0 {
            self.scroll_offset = 0;
            return;
        }
        let max_offset = count.saturating_sub(visible_rows);
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected + 1 - visible_rows;
        }
    }

    /// Configuration index shown at a display row
    pub fn resolve_symbol_index(&self, display_row: usize) -> Option<usize> {
        self.order.get(display_row).copied()
    }

    /// Map a screen row back to a display row using the last rendered
    /// geometry
    pub fn hit_test_row(&self, y: u16) -> Option<usize> {
        if y < self.list_top {
            return None;
        }
        let offset = (y - self.list_top) as usize;
        if offset >= self.visible_rows {
            return None;
        }
        let display_row = self.scroll_offset + offset;
        (display_row < self.snapshot.len()).then_some(display_row)
    }

    pub fn rows(&self) -> &[TickerRow] {
        &self.snapshot
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn move_at(&self, display_row: usize) -> PriceMove {
        self.moves.get(display_row).copied().unwrap_or_default()
    }
}

impl Default for PriceBoardEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::SharedMarketState;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(symbol: &str, price: f64, change: f64) -> TickerRow {
        TickerRow {
            symbol: symbol.to_string(),
            last_price: price,
            change_percent: change,
            updated_at_ms: 1,
            ..TickerRow::default()
        }
    }

    fn board_with(rows: Vec<TickerRow>) -> PriceBoardEngine {
        let names: Vec<String> = rows.iter().map(|r| r.symbol.clone()).collect();
        let shared = SharedMarketState::new(&names);
        let updated = vec![true; rows.len()];
        shared.publish(&rows, &updated);
        let mut board = PriceBoardEngine::new();
        board.refresh(&shared);
        board
    }

    fn displayed_symbols(board: &PriceBoardEngine) -> Vec<&str> {
        board.rows().iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn unsorted_board_keeps_configured_order() {
        let mut board = board_with(vec![
            row("BTCUSDT", 100.0, 1.0),
            row("ETHUSDT", 50.0, 2.0),
            row("BNBUSDT", 75.0, 3.0),
        ]);
        board.set_selected(1);

        assert_eq!(
            displayed_symbols(&board),
            vec!["BTCUSDT", "ETHUSDT", "BNBUSDT"]
        );
        assert_eq!(board.selected(), 1);
        assert_eq!(board.rows()[board.selected()].symbol, "ETHUSDT");
        assert_eq!(board.resolve_symbol_index(2), Some(2));
    }

    #[test]
    fn first_price_cycle_sorts_descending() {
        let rows = vec![
            row("BTCUSDT", 100.0, 0.0),
            row("ETHUSDT", 50.0, 0.0),
            row("BNBUSDT", 75.0, 0.0),
        ];
        let names = symbols(&["BTCUSDT", "ETHUSDT", "BNBUSDT"]);
        let shared = SharedMarketState::new(&names);
        shared.publish(&rows, &[true, true, true]);

        let mut board = PriceBoardEngine::new();
        board.cycle_sort(SortField::Price);
        board.refresh(&shared);

        assert_eq!(
            displayed_symbols(&board),
            vec!["BTCUSDT", "BNBUSDT", "ETHUSDT"]
        );
        // The order map still resolves to configuration indices
        assert_eq!(board.resolve_symbol_index(0), Some(0));
        assert_eq!(board.resolve_symbol_index(1), Some(2));
        assert_eq!(board.resolve_symbol_index(2), Some(1));
    }

    #[test]
    fn equal_keys_keep_configured_order_in_both_directions() {
        let rows = vec![
            row("AAAUSDT", 10.0, 0.0),
            row("BBBUSDT", 10.0, 0.0),
            row("CCCUSDT", 10.0, 0.0),
        ];
        let names = symbols(&["AAAUSDT", "BBBUSDT", "CCCUSDT"]);
        let shared = SharedMarketState::new(&names);
        shared.publish(&rows, &[true, true, true]);

        let mut board = PriceBoardEngine::new();
        board.cycle_sort(SortField::Price); // descending
        board.refresh(&shared);
        assert_eq!(
            displayed_symbols(&board),
            vec!["AAAUSDT", "BBBUSDT", "CCCUSDT"],
            "descending sort must not reorder equal rows"
        );

        board.cycle_sort(SortField::Price); // ascending
        board.refresh(&shared);
        assert_eq!(
            displayed_symbols(&board),
            vec!["AAAUSDT", "BBBUSDT", "CCCUSDT"],
            "ascending sort must not reorder equal rows"
        );
    }

    #[test]
    fn sorting_is_idempotent() {
        let rows = vec![
            row("BTCUSDT", 100.0, -1.0),
            row("ETHUSDT", 50.0, 4.0),
            row("BNBUSDT", 75.0, 4.0),
            row("SOLUSDT", 75.0, -3.0),
        ];
        let names = symbols(&["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT"]);
        let shared = SharedMarketState::new(&names);
        shared.publish(&rows, &[true, true, true, true]);

        let mut board = PriceBoardEngine::new();
        board.cycle_sort(SortField::Change);
        board.refresh(&shared);
        let first = displayed_symbols(&board)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        board.refresh(&shared);
        assert_eq!(displayed_symbols(&board), first);
    }

    #[test]
    fn cycling_three_times_returns_to_configured_order() {
        let mut board = PriceBoardEngine::new();
        assert_eq!(board.sort_state().field, None);
        assert_eq!(board.next_sort_hint(SortField::Price), "↓");

        board.cycle_sort(SortField::Price);
        assert_eq!(board.sort_state().field, Some(SortField::Price));
        assert_eq!(board.sort_state().direction, SortDirection::Descending);
        assert_eq!(board.next_sort_hint(SortField::Price), "↑");
        assert_eq!(board.next_sort_hint(SortField::Change), "↓");

        board.cycle_sort(SortField::Price);
        assert_eq!(board.sort_state().direction, SortDirection::Ascending);
        assert_eq!(board.next_sort_hint(SortField::Price), "=");

        board.cycle_sort(SortField::Price);
        assert_eq!(board.sort_state().field, None);
    }

    #[test]
    fn switching_fields_restarts_at_descending() {
        let mut board = PriceBoardEngine::new();
        board.cycle_sort(SortField::Price);
        board.cycle_sort(SortField::Price); // price ascending
        board.cycle_sort(SortField::Change);
        assert_eq!(board.sort_state().field, Some(SortField::Change));
        assert_eq!(board.sort_state().direction, SortDirection::Descending);
    }

    #[test]
    fn selection_clamps_to_row_count() {
        let mut board = board_with(vec![row("BTCUSDT", 1.0, 0.0), row("ETHUSDT", 2.0, 0.0)]);
        board.selected = 10;
        board.clamp_selected();
        assert_eq!(board.selected(), 1);

        let mut empty = PriceBoardEngine::new();
        empty.selected = 5;
        empty.clamp_selected();
        assert_eq!(empty.selected(), 0);
    }

    #[test]
    fn selection_stays_inside_scroll_window() {
        let rows: Vec<TickerRow> = (0..10)
            .map(|i| row(&format!("SYM{:02}USDT", i), i as f64, 0.0))
            .collect();
        let mut board = board_with(rows);

        for target in [9usize, 0, 5, 9, 4] {
            board.set_selected(target);
            board.record_list_geometry(4, 3);
            let offset = board.scroll_offset();
            assert!(
                offset <= target && target < offset + 3,
                "selected {} outside window [{}, {})",
                target,
                offset,
                offset + 3
            );
        }
    }

    #[test]
    fn scroll_offset_persists_when_selection_stays_visible() {
        let rows: Vec<TickerRow> = (0..10)
            .map(|i| row(&format!("SYM{:02}USDT", i), i as f64, 0.0))
            .collect();
        let mut board = board_with(rows);

        board.set_selected(9);
        board.record_list_geometry(4, 4);
        assert_eq!(board.scroll_offset(), 6);

        // Moving back within the window must not scroll
        board.set_selected(7);
        board.record_list_geometry(4, 4);
        assert_eq!(board.scroll_offset(), 6);
    }

    #[test]
    fn hit_test_inverts_viewport_placement() {
        let rows: Vec<TickerRow> = (0..10)
            .map(|i| row(&format!("SYM{:02}USDT", i), i as f64, 0.0))
            .collect();
        let mut board = board_with(rows);
        board.set_selected(9);
        board.record_list_geometry(4, 3); // shows rows 7..10 at y 4..7

        assert_eq!(board.hit_test_row(4), Some(7));
        assert_eq!(board.hit_test_row(6), Some(9));
        assert_eq!(board.hit_test_row(3), None, "above the list");
        assert_eq!(board.hit_test_row(7), None, "below the window");
    }

    #[test]
    fn price_moves_follow_symbols_across_resort() {
        let names = symbols(&["BTCUSDT", "ETHUSDT"]);
        let shared = SharedMarketState::new(&names);
        shared.publish(
            &[row("BTCUSDT", 100.0, 0.0), row("ETHUSDT", 50.0, 0.0)],
            &[true, true],
        );

        let mut board = PriceBoardEngine::new();
        board.refresh(&shared);
        assert_eq!(board.move_at(0), PriceMove::Steady, "first frame never flags");

        // ETHUSDT rises above BTCUSDT and the board is sorted by price
        shared.publish(
            &[row("BTCUSDT", 100.0, 0.0), row("ETHUSDT", 150.0, 0.0)],
            &[true, true],
        );
        board.cycle_sort(SortField::Price);
        board.refresh(&shared);

        assert_eq!(board.rows()[0].symbol, "ETHUSDT");
        assert_eq!(board.move_at(0), PriceMove::Up);
        assert_eq!(board.move_at(1), PriceMove::Steady);
    }
}
