// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive chat view.
//!
//! The terminal runs in raw mode on the alternate screen. A blocking thread
//! reads terminal events into a channel; the async loop redraws whenever
//! the store changes and feeds key presses to the composer.

use std::io::{Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cafe_client::{CafeClient, ClientConfig};
use cafe_core::{Key, State};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::display::chat_screen;
use crate::error::Result;

use super::session_error;

/// How long the reader thread blocks before checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// What a terminal event asks the view to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Reopen a push link that gave up, then re-fetch the directory and
    /// the open session's details.
    Refresh,
    Key(Key),
    Redraw,
    Ignore,
}

/// Maps a terminal event to an [`Action`].
pub fn action(event: &Event) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Release => Action::Ignore,
        Event::Key(key) if key.modifiers.contains(KeyModifiers::CONTROL) => match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Action::Quit,
            KeyCode::Char('r') => Action::Refresh,
            _ => Action::Ignore,
        },
        Event::Key(key) => map_key(key).map_or(Action::Ignore, Action::Key),
        Event::Resize(..) => Action::Redraw,
        _ => Action::Ignore,
    }
}

/// Translates a crossterm key into the composer's key set.
///
/// Terminals rarely report Shift+Enter, so Alt+Enter also inserts a newline.
pub fn map_key(key: &KeyEvent) -> Option<Key> {
    let key = match key.code {
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            Key::ShiftEnter
        }
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Up | KeyCode::BackTab => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    Some(key)
}

/// Opens `session` (or a new one) and runs the view until the user quits.
pub async fn run(config: ClientConfig, session: Option<String>) -> Result<()> {
    let mut client = CafeClient::new(config)?;
    client.load_sessions().await?;
    client.load_participants().await?;
    if let Err(e) = client.load_modes().await {
        warn!(error = %e, "failed to load modes");
    }
    let opened = match session {
        Some(id) => client
            .open_session(&id)
            .await
            .map_err(session_error(&id))?,
        None => client.create_session().await?,
    };
    info!(session_id = %opened.id, "chat opened");

    let result = match TerminalGuard::enter() {
        Ok(_guard) => event_loop(&mut client).await,
        Err(e) => Err(e),
    };
    client.shutdown().await;
    result
}

enum Step {
    Changed,
    Input(Event),
    Failed(std::io::Error),
    Closed,
}

async fn event_loop(client: &mut CafeClient) -> Result<()> {
    let mut changes = client.store().subscribe();
    let (tx, mut input) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_reader(tx, Arc::clone(&stop));

    let mut out = std::io::stdout();
    let mut status: Option<String> = None;
    let mut result = draw(&mut out, &client.state(), status.as_deref());

    while result.is_ok() {
        let step = tokio::select! {
            changed = changes.changed() => match changed {
                Ok(()) => Step::Changed,
                Err(_) => Step::Closed,
            },
            event = input.recv() => match event {
                Some(Ok(event)) => Step::Input(event),
                Some(Err(e)) => Step::Failed(e),
                None => Step::Closed,
            },
        };
        let event = match step {
            Step::Changed => {
                result = draw(&mut out, &client.state(), status.as_deref());
                continue;
            }
            Step::Input(event) => event,
            Step::Failed(e) => {
                result = Err(e.into());
                break;
            }
            Step::Closed => break,
        };

        match action(&event) {
            Action::Quit => break,
            Action::Ignore => continue,
            Action::Redraw => {}
            Action::Refresh => {
                status = match client.load_participants().await {
                    Ok(_) => None,
                    Err(e) => Some(format!("refresh failed: {e}")),
                };
                client.reconnect().await;
                client.refresh_session().await;
            }
            Action::Key(key) => {
                if let Some(submission) = client.press_key(key) {
                    status = match client.submit(&submission).await {
                        Ok(_) => None,
                        Err(e) => {
                            warn!(error = %e, "send failed");
                            Some(format!("send failed: {e}"))
                        }
                    };
                }
            }
        }
        result = draw(&mut out, &client.state(), status.as_deref());
    }

    stop.store(true, Ordering::Relaxed);
    drop(input);
    if let Err(e) = reader.await {
        warn!(error = %e, "input reader panicked");
    }
    result
}

fn spawn_reader(
    tx: mpsc::UnboundedSender<std::io::Result<Event>>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(INPUT_POLL) {
                Ok(false) => {}
                Ok(true) => {
                    let read = event::read();
                    let failed = read.is_err();
                    if tx.send(read).is_err() || failed {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    })
}

fn draw(out: &mut Stdout, state: &State, status: Option<&str>) -> Result<()> {
    let (width, height) = terminal::size()?;
    let screen = chat_screen(state, status, width, height);
    queue!(out, Hide)?;
    for (row, line) in screen.lines.iter().enumerate() {
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        queue!(out, MoveTo(0, row), Clear(ClearType::CurrentLine), Print(line))?;
    }
    queue!(out, MoveTo(screen.cursor.0, screen.cursor.1), Show)?;
    out.flush()?;
    Ok(())
}

/// Raw mode plus alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(std::io::stdout(), EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
#[path = "chat_tests.rs"]
mod tests;
