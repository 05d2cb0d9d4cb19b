//! Terminal UI
//!
//! One task drives the whole interface: it waits on terminal input, tracker
//! events and a redraw tick, re-derives the display list from the latest
//! snapshot, and redraws.

pub mod format;
pub mod keys;
pub mod render;

use crate::app::{Command, DashboardState, Screen};
use crate::constants::UI_TICK_MS;
use crate::pipeline::derive;
use crate::tracker::MarketTracker;
use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Runs the dashboard until the user quits
///
/// Polling starts when the UI starts and its timer stops when the UI exits.
/// The terminal is restored on every exit path, panics included.
pub async fn run(tracker: &MarketTracker) -> Result<()> {
    install_panic_hook();
    let mut guard = TerminalGuard::enter()?;
    event_loop(&mut guard.terminal, tracker).await
}

/// Owns the raw-mode, alternate-screen terminal and undoes both on drop
struct TerminalGuard {
    terminal: Term,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        match init_terminal() {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore_terminal(&mut io::stdout());
                Err(e)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal(self.terminal.backend_mut());
    }
}

fn init_terminal() -> Result<Term> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Best effort; errors are ignored
fn restore_terminal(out: &mut impl Write) {
    let _ = disable_raw_mode();
    let _ = execute!(out, LeaveAlternateScreen, Show);
}

/// Puts the terminal back before the panic message is printed
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal(&mut io::stdout());
        previous(info);
    }));
}

async fn event_loop(terminal: &mut Term, tracker: &MarketTracker) -> Result<()> {
    let _poller = tracker.start();
    let mut updates = tracker.subscribe();
    let mut input = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(UI_TICK_MS));
    let mut state = DashboardState::new();
    let currency = tracker.vs_currency().to_string();

    loop {
        let fetch = tracker.current().await;
        let screen = Screen::of(&fetch);
        let raw = fetch
            .snapshot
            .as_ref()
            .map(|s| s.coins.as_slice())
            .unwrap_or(&[]);
        let derived = derive(raw, &state.query);
        state.clamp_cursor(derived.len());
        state.grid_columns = render::grid_columns(terminal.size()?.width);

        terminal.draw(|frame| {
            render::draw(
                frame,
                &render::ViewModel {
                    fetch: &fetch,
                    state: &state,
                    derived: &derived,
                    currency: &currency,
                },
            )
        })?;

        let action = tokio::select! {
            event = input.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    keys::map_key(screen, &state, key)
                }
                Some(Ok(_)) => None,
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            update = updates.recv() => match update {
                Ok(event) => {
                    tracing::trace!(
                        id = %event.id(),
                        event_type = event.event_type(),
                        %event,
                        "Tracker event"
                    );
                    None
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "UI lagged behind tracker events");
                    None
                }
                Err(RecvError::Closed) => break,
            },
            _ = tick.tick() => None,
        };

        if let Some(action) = action {
            match state.apply(action, &derived) {
                Some(Command::Quit) => break,
                Some(Command::Refresh) => {
                    tracing::info!("Manual refresh requested");
                    tracker.spawn_refresh();
                }
                None => {}
            }
        }
    }

    tracing::info!("Dashboard closed");
    Ok(())
}
