//! Rendering for every screen of the dashboard
//!
//! All functions here are pure with respect to application state: they read
//! a [`ViewModel`] and draw into the frame.

use super::format::{format_amount, format_change, format_compact, format_price};
use crate::app::{DashboardState, InputMode, Screen};
use crate::error::FetchError;
use crate::filters::{MoversMode, SortField};
use crate::store::FetchState;
use crate::types::CoinRecord;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Card size in terminal cells
pub const CARD_WIDTH: u16 = 30;
pub const CARD_HEIGHT: u16 = 7;

const MODAL_WIDTH: u16 = 64;
const MODAL_HEIGHT: u16 = 18;
const RANGE_BAR_WIDTH: usize = 30;

/// Everything a frame needs
pub struct ViewModel<'a> {
    pub fetch: &'a FetchState,
    pub state: &'a DashboardState,
    pub derived: &'a [&'a CoinRecord],
    /// Quote currency code (e.g. "inr")
    pub currency: &'a str,
}

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

pub fn draw(frame: &mut Frame, view: &ViewModel) {
    let area = frame.area();
    match Screen::of(view.fetch) {
        Screen::Loading => draw_loading(frame, area),
        Screen::Error => {
            if let Some(error) = view.fetch.error.as_ref() {
                draw_error(frame, area, error);
            }
        }
        Screen::Dashboard => {
            draw_dashboard(frame, area, view);
            if let Some(coin) = view.state.selected.as_ref() {
                draw_modal(frame, area, coin, view.currency);
            }
        }
    }
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "⟳",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Loading Cryptocurrencies",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Fetching live market data...",
            Style::default().fg(Color::Gray),
        )),
    ];
    let inner = centered(area, 40, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_error(frame: &mut Frame, area: Rect, error: &FetchError) {
    let block = Block::default()
        .title(Span::styled(
            " Oops! Something went wrong ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let key = Style::default().add_modifier(Modifier::BOLD);
    let hint = Style::default().fg(Color::Blue);
    let lines = vec![
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::LightRed))),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", key),
            Span::raw(" or "),
            Span::styled("r", key),
            Span::raw(" to try again, "),
            Span::styled("q", key),
            Span::raw(" to quit."),
        ]),
        Line::from(""),
        Line::from(Span::styled("Having trouble? Try:", Style::default().fg(Color::Gray))),
        Line::from(Span::styled("• Checking your internet connection", hint)),
        Line::from(Span::styled("• Waiting a moment and trying again", hint)),
    ];

    let rect = centered(area, 70, lines.len() as u16 + 2);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

fn draw_dashboard(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, chunks[0], view);
    draw_search(frame, chunks[1], view.state);
    draw_filters(frame, chunks[2], view.state);
    draw_results_info(frame, chunks[3], view);
    if view.derived.is_empty() {
        draw_empty_state(frame, chunks[4]);
    } else {
        draw_grid(frame, chunks[4], view);
    }
    draw_help(frame, chunks[5]);
}

fn draw_header(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let updated = view
        .fetch
        .snapshot
        .as_ref()
        .map(|s| format!("updated {}s ago", s.age().as_secs()))
        .unwrap_or_default();
    let live = if view.fetch.loading {
        Span::styled("● Refreshing", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("● Live Data", Style::default().fg(Color::Green))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Market Dashboard",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  Real-time Cryptocurrency tracker",
                Style::default().fg(Color::LightBlue),
            ),
        ]),
        Line::from(vec![
            live,
            Span::raw(" • "),
            Span::raw(format!("{} Cryptocurrencies", view.derived.len())),
            Span::raw(" • "),
            Span::styled(updated, Style::default().fg(Color::Gray)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_search(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let focused = state.mode == InputMode::Search;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(" Search [/] ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    let line = if state.query.search.is_empty() && !focused {
        Line::from(Span::styled(
            "Search cryptocurrencies...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(state.query.search.clone())];
        if focused {
            spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_filters(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let filters = &state.query.filters;
    let sort = &state.query.sort;
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let value = Style::default().fg(Color::White);

    let filter_line = Line::from(vec![
        Span::styled("[r] ", key),
        Span::raw("Rank: "),
        Span::styled(filters.rank.label(), value),
        Span::styled("  [c] ", key),
        Span::raw("24h: "),
        Span::styled(filters.change.label(), value),
        Span::styled("  [p] ", key),
        Span::raw("Price: "),
        Span::styled(filters.bracket.label(), value),
        Span::styled("  [g] ", key),
        Span::raw("Movers: "),
        Span::styled(filters.movers.label(), value),
    ]);

    let mut sort_spans = vec![Span::raw("Sort: ")];
    for (i, field) in SortField::SELECTABLE.iter().enumerate() {
        sort_spans.push(Span::styled(format!("[{}] ", i + 1), key));
        let label = if sort.field == *field {
            Span::styled(
                format!("{} {}", field.label(), sort.direction.arrow()),
                Style::default().fg(Color::Black).bg(Color::Blue),
            )
        } else {
            Span::raw(field.label())
        };
        sort_spans.push(label);
        sort_spans.push(Span::raw("  "));
    }
    if !sort.field.is_selectable() {
        sort_spans.push(Span::styled(
            format!("({} {}) ", sort.field.label(), sort.direction.arrow()),
            Style::default().fg(Color::Gray),
        ));
    }
    let clear_style = if state.can_clear_filters() {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    sort_spans.push(Span::styled("[x] Clear Filters", clear_style));

    let block = Block::default()
        .title(" Filters & Sorting ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(vec![filter_line, Line::from(sort_spans)]).block(block),
        area,
    );
}

fn draw_results_info(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let search = &view.state.query.search;

    let mut first = vec![
        Span::raw("Showing "),
        Span::styled(view.derived.len().to_string(), bold),
        Span::raw(" cryptocurrencies"),
    ];
    if !search.is_empty() {
        first.push(Span::raw(" matching \""));
        first.push(Span::styled(search.clone(), Style::default().fg(Color::LightBlue)));
        first.push(Span::raw("\""));
    }

    let mut lines = vec![Line::from(first)];
    match view.state.query.filters.movers {
        MoversMode::All => {}
        MoversMode::TopGainers => lines.push(Line::from(Span::styled("Showing Top 10 Gainers", bold))),
        MoversMode::TopLosers => lines.push(Line::from(Span::styled("Showing Top 10 Losers", bold))),
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_empty_state(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "No cryptocurrencies found",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Try adjusting your search or filters",
            Style::default().fg(Color::LightBlue),
        )),
    ];
    let rect = centered(area, 40, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn draw_grid(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let columns = grid_columns(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let cursor_row = view.state.cursor / columns;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);

    for (offset, chunk) in view
        .derived
        .chunks(columns)
        .skip(first_row)
        .take(visible_rows)
        .enumerate()
    {
        let y = area.y + offset as u16 * CARD_HEIGHT;
        for (col, coin) in chunk.iter().enumerate() {
            let index = (first_row + offset) * columns + col;
            let rect = Rect::new(area.x + col as u16 * CARD_WIDTH, y, CARD_WIDTH, CARD_HEIGHT)
                .intersection(area);
            draw_card(frame, rect, coin, index == view.state.cursor, view.currency);
        }
    }
}

fn change_style(change: Option<f64>) -> (Style, &'static str) {
    match change {
        Some(c) if c > 0.0 => (Style::default().fg(Color::Green), "▲"),
        _ => (Style::default().fg(Color::Red), "▼"),
    }
}

fn draw_card(frame: &mut Frame, area: Rect, coin: &CoinRecord, focused: bool, currency: &str) {
    let border = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let rank = coin
        .market_cap_rank
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| "#-".to_string());
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", coin.name),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    let (style, arrow) = change_style(coin.price_change_percentage_24h);
    let change = coin
        .price_change_percentage_24h
        .map(|c| format!("{} {:.2}%", arrow, c.abs()))
        .unwrap_or_else(|| "N/A".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(coin.symbol.to_uppercase(), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(rank, Style::default().fg(Color::LightBlue)),
        ]),
        Line::from(Span::styled(
            format_price(coin.current_price, currency),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("24h "), Span::styled(change, style)]),
        Line::from(vec![
            Span::styled("MCap ", Style::default().fg(Color::Gray)),
            Span::raw(format_compact(coin.market_cap, currency)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_modal(frame: &mut Frame, area: Rect, coin: &CoinRecord, currency: &str) {
    let rect = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ({}) ", coin.name, coin.symbol.to_uppercase()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Double);

    let label = Style::default().fg(Color::Gray);
    let (style, arrow) = change_style(coin.price_change_percentage_24h);
    let rank = coin
        .market_cap_rank
        .map(|r| format!("Rank #{}", r))
        .unwrap_or_else(|| "Unranked".to_string());

    let mut lines = vec![
        Line::from(Span::styled("Current Price", label)),
        Line::from(vec![
            Span::styled(
                format_price(coin.current_price, currency),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", arrow, format_change(coin.price_change_percentage_24h)),
                style,
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Market Cap     ", label),
            Span::raw(format_amount(coin.market_cap, currency)),
            Span::styled(format!("  {}", rank), Style::default().fg(Color::LightBlue)),
        ]),
        Line::from(vec![
            Span::styled("24h Volume     ", label),
            Span::raw(format_amount(coin.total_volume, currency)),
        ]),
        Line::from(""),
        Line::from(Span::styled("24h Price Range", label)),
    ];
    lines.push(Line::from(range_bar(coin.range_position())));
    lines.push(Line::from(vec![
        Span::styled(format!("Low  {}", format_price(coin.low_24h, currency)), Style::default().fg(Color::Red)),
        Span::raw("   "),
        Span::styled(format!("High {}", format_price(coin.high_24h, currency)), Style::default().fg(Color::Green)),
    ]));
    if let Some(updated) = coin.last_updated {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Last updated {}", updated.format("%Y-%m-%d %H:%M:%S UTC")),
            label,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Esc] Close Details",
        Style::default().fg(Color::Cyan),
    )));

    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    frame.render_widget(Paragraph::new(lines), inner);
}

/// A horizontal track with a marker at `position` (0.0..=1.0)
fn range_bar(position: Option<f64>) -> String {
    let Some(position) = position else {
        return "─".repeat(RANGE_BAR_WIDTH);
    };
    let marker = (position * (RANGE_BAR_WIDTH - 1) as f64).round() as usize;
    (0..RANGE_BAR_WIDTH)
        .map(|i| if i == marker { '●' } else { '─' })
        .collect()
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = "/ search  r c p g filters  1 2 3 sort  x clear  ←↑↓→ move  Enter details  R refresh  q quit";
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))),
        area,
    );
}

/// A `width` x `height` rect centered in `area`, clamped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Action;
    use crate::pipeline::derive;
    use crate::provider::mock::coin;
    use crate::types::MarketSnapshot;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn render(fetch: &FetchState, state: &DashboardState) -> String {
        let raw = fetch
            .snapshot
            .as_ref()
            .map(|s| s.coins.as_slice())
            .unwrap_or(&[]);
        let derived = derive(raw, &state.query);
        let view = ViewModel {
            fetch,
            state,
            derived: &derived,
            currency: "usd",
        };

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, &view)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded(coins: Vec<CoinRecord>) -> FetchState {
        FetchState {
            snapshot: Some(Arc::new(MarketSnapshot::new(coins, "mock".into()))),
            error: None,
            loading: false,
        }
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(10), 1);
        assert_eq!(grid_columns(60), 2);
        assert_eq!(grid_columns(119), 3);
    }

    #[test]
    fn test_renders_loading() {
        let fetch = FetchState {
            loading: true,
            ..FetchState::default()
        };
        let screen = render(&fetch, &DashboardState::new());
        assert!(screen.contains("Loading Cryptocurrencies"));
    }

    #[test]
    fn test_error_replaces_data_view() {
        let mut fetch = loaded(vec![coin("btc", 1, 100.0, 1.0)]);
        fetch.error = Some(FetchError::RateLimited);
        let screen = render(&fetch, &DashboardState::new());
        assert!(screen.contains("Oops! Something went wrong"));
        assert!(screen.contains("Rate limit exceeded"));
        assert!(!screen.contains("BTC"));
    }

    #[test]
    fn test_renders_cards_and_results_line() {
        let fetch = loaded(vec![coin("btc", 1, 100.0, 2.5), coin("eth", 2, 50.0, -1.0)]);
        let screen = render(&fetch, &DashboardState::new());
        assert!(screen.contains("Showing 2 cryptocurrencies"));
        assert!(screen.contains("$100.00"));
        assert!(screen.contains("▲ 2.50%"));
        assert!(screen.contains("▼ 1.00%"));
    }

    #[test]
    fn test_renders_empty_state() {
        let fetch = loaded(vec![coin("btc", 1, 100.0, 2.5)]);
        let mut state = DashboardState::new();
        for c in "zzz".chars() {
            state.apply(Action::SearchInput(c), &[]);
        }
        let screen = render(&fetch, &state);
        assert!(screen.contains("No cryptocurrencies found"));
        assert!(screen.contains("matching \"zzz\""));
    }

    #[test]
    fn test_renders_detail_modal() {
        let fetch = loaded(vec![coin("btc", 1, 100.0, 2.5)]);
        let mut state = DashboardState::new();
        state.selected = Some(coin("btc", 1, 100.0, 2.5));
        let screen = render(&fetch, &state);
        assert!(screen.contains("BTC (BTC)"));
        assert!(screen.contains("Rank #1"));
        assert!(screen.contains("Close Details"));
    }

    #[test]
    fn test_range_bar_marker() {
        let bar = range_bar(Some(0.0));
        assert!(bar.starts_with('●'));
        let bar = range_bar(Some(1.0));
        assert!(bar.ends_with('●'));
        assert!(!range_bar(None).contains('●'));
    }
}
