//! Dashboard interaction state and its reducer
//!
//! All user-controlled inputs live in [`DashboardState`] and change only
//! through [`DashboardState::apply`]. The UI loop maps key presses to
//! [`Action`]s, applies them, and carries out the returned [`Command`].

use crate::filters::{FilterState, SortField, SortState};
use crate::pipeline::Query;
use crate::store::FetchState;
use crate::types::CoinRecord;

/// Which top-level view to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// No snapshot yet and no error
    Loading,
    /// The last fetch failed; replaces the data view entirely
    Error,
    Dashboard,
}

impl Screen {
    pub fn of(state: &FetchState) -> Self {
        if state.error.is_some() {
            Screen::Error
        } else if state.snapshot.is_some() {
            Screen::Dashboard
        } else {
            Screen::Loading
        }
    }
}

/// Where keystrokes go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Browse,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FocusSearch,
    BlurSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    CycleRank,
    CycleChange,
    CycleBracket,
    CycleMovers,
    SortBy(SortField),
    ClearFilters,
    MoveCursor(Move),
    OpenDetail,
    CloseDetail,
    Refresh,
    Quit,
}

/// Side effects the UI loop must carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Quit,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub query: Query,
    pub mode: InputMode,
    /// Index into the derived list
    pub cursor: usize,
    /// Cards per row in the last rendered grid
    pub grid_columns: usize,
    /// Coin shown in the detail modal. Survives re-fetches; only
    /// [`Action::CloseDetail`] clears it.
    pub selected: Option<CoinRecord>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            query: Query::default(),
            mode: InputMode::default(),
            cursor: 0,
            grid_columns: 1,
            selected: None,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action. `derived` is the list currently on screen.
    pub fn apply(&mut self, action: Action, derived: &[&CoinRecord]) -> Option<Command> {
        match action {
            Action::FocusSearch => self.mode = InputMode::Search,
            Action::BlurSearch => self.mode = InputMode::Browse,
            Action::SearchInput(c) => {
                self.query.search.push(c);
                self.cursor = 0;
            }
            Action::SearchBackspace => {
                self.query.search.pop();
                self.cursor = 0;
            }
            Action::SearchClear => {
                self.query.search.clear();
                self.cursor = 0;
            }
            Action::CycleRank => self.update_filters(|f| f.rank = f.rank.next()),
            Action::CycleChange => self.update_filters(|f| f.change = f.change.next()),
            Action::CycleBracket => self.update_filters(|f| f.bracket = f.bracket.next()),
            Action::CycleMovers => self.update_filters(|f| f.movers = f.movers.next()),
            Action::SortBy(field) => {
                self.query.sort = self.query.sort.select(field);
            }
            Action::ClearFilters => {
                if self.can_clear_filters() {
                    self.query.filters = FilterState::default();
                    self.query.sort = SortState::cleared();
                    self.cursor = 0;
                }
            }
            Action::MoveCursor(direction) => self.move_cursor(direction, derived.len()),
            Action::OpenDetail => {
                if let Some(coin) = derived.get(self.cursor) {
                    self.selected = Some((*coin).clone());
                }
            }
            Action::CloseDetail => self.selected = None,
            Action::Refresh => return Some(Command::Refresh),
            Action::Quit => return Some(Command::Quit),
        }
        None
    }

    /// "Clear filters" is only offered when some filter is set
    pub fn can_clear_filters(&self) -> bool {
        !self.query.filters.is_default()
    }

    /// Keeps the cursor on the grid after the derived list shrinks
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn update_filters(&mut self, change: impl FnOnce(&mut FilterState)) {
        change(&mut self.query.filters);
        self.cursor = 0;
    }

    fn move_cursor(&mut self, direction: Move, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let columns = self.grid_columns.max(1);
        let last = len - 1;
        self.cursor = match direction {
            Move::Left => self.cursor.saturating_sub(1),
            Move::Right => (self.cursor + 1).min(last),
            Move::Up => self.cursor.checked_sub(columns).unwrap_or(self.cursor),
            Move::Down => {
                let next = self.cursor + columns;
                if next <= last {
                    next
                } else {
                    self.cursor
                }
            }
        };
    }
}
