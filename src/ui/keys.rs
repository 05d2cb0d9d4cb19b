//! Key bindings

use crate::app::{Action, DashboardState, InputMode, Move, Screen};
use crate::filters::SortField;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Maps a key press to an action for the current screen and mode
pub fn map_key(screen: Screen, state: &DashboardState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('u') if state.mode == InputMode::Search => Some(Action::SearchClear),
            _ => None,
        };
    }

    match screen {
        Screen::Loading => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        Screen::Error => match key.code {
            KeyCode::Enter | KeyCode::F(5) | KeyCode::Char('r') | KeyCode::Char('R') => {
                Some(Action::Refresh)
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
        Screen::Dashboard if state.selected.is_some() => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => Some(Action::CloseDetail),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        Screen::Dashboard => match state.mode {
            InputMode::Search => map_search_key(key),
            InputMode::Browse => map_browse_key(state, key),
        },
    }
}

fn map_search_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Some(Action::BlurSearch),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Char(c) => Some(Action::SearchInput(c)),
        _ => None,
    }
}

fn map_browse_key(state: &DashboardState, key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('/') => Action::FocusSearch,
        KeyCode::Esc if !state.query.search.is_empty() => Action::SearchClear,
        KeyCode::Char('r') => Action::CycleRank,
        KeyCode::Char('c') => Action::CycleChange,
        KeyCode::Char('p') => Action::CycleBracket,
        KeyCode::Char('g') => Action::CycleMovers,
        KeyCode::Char('1') => Action::SortBy(SortField::CurrentPrice),
        KeyCode::Char('2') => Action::SortBy(SortField::MarketCap),
        KeyCode::Char('3') => Action::SortBy(SortField::PriceChange24h),
        KeyCode::Char('x') => Action::ClearFilters,
        KeyCode::Left | KeyCode::Char('h') => Action::MoveCursor(Move::Left),
        KeyCode::Right | KeyCode::Char('l') => Action::MoveCursor(Move::Right),
        KeyCode::Up | KeyCode::Char('k') => Action::MoveCursor(Move::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveCursor(Move::Down),
        KeyCode::Enter => Action::OpenDetail,
        KeyCode::F(5) | KeyCode::Char('R') => Action::Refresh,
        _ => return None,
    };
    Some(action)
}
