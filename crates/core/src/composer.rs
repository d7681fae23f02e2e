// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The message input line and its suggestion menu.
//!
//! A [`Composer`] is an immutable value: every key press produces a new one,
//! which the caller stores back into the shared state. Key handling follows
//! the input contract:
//!
//! - typing re-runs live mention detection and opens/updates/closes the menu
//! - Left/Right/Home/End only ever close the menu (when the cursor leaves
//!   the token), they never open it
//! - Escape closes the menu; it stays closed for that `@` until the token
//!   goes away
//! - Up/Down move the highlight, Tab picks the highlighted candidate
//! - Enter picks the highlighted candidate when the menu shows any,
//!   otherwise it submits; it never inserts a newline
//! - Shift+Enter inserts a newline

use crate::mention::{self, MentionQuery};
use crate::model::Participant;

/// A key press, independent of any terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Tab,
    Enter,
    ShiftEnter,
    Escape,
}

/// Visible state of the mention suggestion menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionMenu {
    /// Present while the menu is shown.
    pub active: Option<MentionQuery>,
    /// Index into the filtered candidates.
    pub highlighted: usize,
    /// Trigger position the user closed with Escape.
    dismissed: Option<usize>,
}

impl MentionMenu {
    /// Whether the menu is shown.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// The live query, if the menu is shown.
    pub fn query(&self) -> Option<&str> {
        self.active.as_ref().map(|q| q.query.as_str())
    }

    /// Candidates the menu shows for the current query.
    pub fn candidates<'a>(&self, directory: &'a [Participant]) -> Vec<&'a Participant> {
        match &self.active {
            Some(q) => mention::candidates(directory, &q.query),
            None => Vec::new(),
        }
    }
}

/// A message the user asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub content: String,
    /// Participant ids resolved from `content`.
    pub mentions: Vec<String>,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The composer changed (or stayed the same).
    Updated(Composer),
    /// The user submitted. The composer is left untouched so a failed send
    /// keeps the text; call [`Composer::cleared`] once the send succeeds.
    Submit(Submission),
}

/// Input buffer plus cursor plus menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    text: String,
    /// Character index.
    cursor: usize,
    menu: MentionMenu,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a composer over existing text with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Composer {
            text,
            cursor,
            menu: MentionMenu::default(),
        }
        .redetect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn menu(&self) -> &MentionMenu {
        &self.menu
    }

    /// An empty composer, used after a successful send.
    pub fn cleared(&self) -> Self {
        Self::default()
    }

    /// Applies one key press.
    pub fn handle_key(&self, key: Key, directory: &[Participant]) -> KeyOutcome {
        let next = match key {
            Key::Char(c) => self.insert(c),
            Key::ShiftEnter => self.insert('\n'),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete(),
            Key::Left => self.move_to(self.cursor.saturating_sub(1)),
            Key::Right => self.move_to(self.cursor + 1),
            Key::Home => self.move_to(0),
            Key::End => self.move_to(self.len()),
            Key::Up => self.shift_highlight(directory, -1),
            Key::Down => self.shift_highlight(directory, 1),
            Key::Tab => self.pick_highlighted(directory).unwrap_or_else(|| self.clone()),
            Key::Escape => self.dismiss(),
            Key::Enter => {
                if let Some(picked) = self.pick_highlighted(directory) {
                    picked
                } else if self.text.trim().is_empty() {
                    self.clone()
                } else {
                    return KeyOutcome::Submit(Submission {
                        content: self.text.clone(),
                        mentions: mention::resolve(&self.text, directory),
                    });
                }
            }
        };
        KeyOutcome::Updated(next)
    }

    /// Completes the active mention with `participant`.
    ///
    /// Does nothing when the menu is closed.
    pub fn select(&self, participant: &Participant) -> Self {
        let Some(active) = &self.menu.active else {
            return self.clone();
        };
        let (text, cursor) = mention::complete(&self.text, active.trigger, &participant.name);
        Composer {
            text,
            cursor,
            menu: MentionMenu::default(),
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn insert(&self, c: char) -> Self {
        let mut text = self.text.clone();
        text.insert(self.byte_offset(self.cursor), c);
        Composer {
            text,
            cursor: self.cursor + 1,
            menu: self.menu.clone(),
        }
        .redetect()
    }

    fn backspace(&self) -> Self {
        if self.cursor == 0 {
            return self.clone();
        }
        let mut text = self.text.clone();
        text.remove(self.byte_offset(self.cursor - 1));
        Composer {
            text,
            cursor: self.cursor - 1,
            menu: self.menu.clone(),
        }
        .redetect()
    }

    fn delete(&self) -> Self {
        if self.cursor >= self.len() {
            return self.clone();
        }
        let mut text = self.text.clone();
        text.remove(self.byte_offset(self.cursor));
        Composer {
            text,
            cursor: self.cursor,
            menu: self.menu.clone(),
        }
        .redetect()
    }

    /// Moves the cursor; closes the menu if the cursor left the token.
    fn move_to(&self, cursor: usize) -> Self {
        let cursor = cursor.min(self.len());
        let mut menu = self.menu.clone();
        if let Some(active) = &self.menu.active {
            match mention::detect(&self.text, cursor) {
                Ok(Some(found)) if found.trigger == active.trigger => {
                    if found.query != active.query {
                        menu.highlighted = 0;
                    }
                    menu.active = Some(found);
                }
                _ => {
                    menu.active = None;
                    menu.highlighted = 0;
                }
            }
        }
        Composer {
            text: self.text.clone(),
            cursor,
            menu,
        }
    }

    /// Re-runs detection after an edit.
    fn redetect(self) -> Self {
        let found = mention::detect(&self.text, self.cursor).ok().flatten();
        let mut menu = self.menu;
        match found {
            Some(q) if menu.dismissed == Some(q.trigger) => {
                menu.active = None;
            }
            Some(q) => {
                if menu.query() != Some(q.query.as_str()) {
                    menu.highlighted = 0;
                }
                menu.dismissed = None;
                menu.active = Some(q);
            }
            None => {
                menu = MentionMenu::default();
            }
        }
        Composer {
            text: self.text,
            cursor: self.cursor,
            menu,
        }
    }

    fn dismiss(&self) -> Self {
        let dismissed = self
            .menu
            .active
            .as_ref()
            .map(|q| q.trigger)
            .or(self.menu.dismissed);
        Composer {
            text: self.text.clone(),
            cursor: self.cursor,
            menu: MentionMenu {
                active: None,
                highlighted: 0,
                dismissed,
            },
        }
    }

    fn shift_highlight(&self, directory: &[Participant], delta: isize) -> Self {
        let count = self.menu.candidates(directory).len();
        if count == 0 {
            return self.clone();
        }
        let current = self.menu.highlighted.min(count - 1) as isize;
        let next = (current + delta).rem_euclid(count as isize) as usize;
        let mut menu = self.menu.clone();
        menu.highlighted = next;
        Composer {
            text: self.text.clone(),
            cursor: self.cursor,
            menu,
        }
    }

    fn pick_highlighted(&self, directory: &[Participant]) -> Option<Self> {
        let candidates = self.menu.candidates(directory);
        let index = self.menu.highlighted.min(candidates.len().checked_sub(1)?);
        candidates.get(index).map(|p| self.select(p))
    }
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;
