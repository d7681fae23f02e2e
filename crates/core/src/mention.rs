// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mention detection and resolution.
//!
//! Two independent passes over the input text:
//!
//! - **Live detection** ([`detect`]) runs on every keystroke and finds the
//!   `@` token the cursor is sitting in, to drive the suggestion menu.
//! - **Resolution** ([`resolve`]) runs once at send time over the whole
//!   buffer and produces the participant ids that go out with the message.
//!
//! The two never share state. Whatever the user picked from the menu, only
//! the literal text at send time decides who was mentioned.
//!
//! Cursor positions are character indices, not byte offsets, so multi-byte
//! names behave like any other.

use crate::error::{Error, Result};
use crate::model::Participant;

/// The character that opens a mention.
pub const TRIGGER: char = '@';

/// An in-progress mention under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionQuery {
    /// Character index of the `@`.
    pub trigger: usize,
    /// Text typed between the `@` and the cursor.
    pub query: String,
}

/// Finds the mention token the cursor is currently completing.
///
/// Returns `None` when the menu should be hidden: there is no `@` before
/// the cursor, or the text between that `@` and the cursor contains
/// whitespace. An `@` immediately before the cursor yields an empty query.
pub fn detect(text: &str, cursor: usize) -> Result<Option<MentionQuery>> {
    let len = text.chars().count();
    if cursor > len {
        return Err(Error::CursorOutOfRange { cursor, len });
    }

    let before: Vec<char> = text.chars().take(cursor).collect();
    let Some(trigger) = before.iter().rposition(|c| *c == TRIGGER) else {
        return Ok(None);
    };

    let query: String = before[trigger + 1..].iter().collect();
    if query.chars().any(char::is_whitespace) {
        return Ok(None);
    }

    Ok(Some(MentionQuery { trigger, query }))
}

/// Directory entries whose name contains `query`, case-insensitively.
///
/// An empty query matches the whole directory.
pub fn candidates<'a>(directory: &'a [Participant], query: &str) -> Vec<&'a Participant> {
    if query.is_empty() {
        return directory.iter().collect();
    }
    let needle = query.to_lowercase();
    directory
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Replaces everything from the trigger onward with `@<name> `.
///
/// Returns the new text and the cursor position (end of text).
pub fn complete(text: &str, trigger: usize, name: &str) -> (String, usize) {
    let mut completed: String = text.chars().take(trigger).collect();
    completed.push(TRIGGER);
    completed.push_str(name);
    completed.push(' ');
    let cursor = completed.chars().count();
    (completed, cursor)
}

/// Resolves the participants mentioned anywhere in `text`.
///
/// A participant counts as mentioned when `@<name>` appears and is followed
/// by whitespace or the end of the text. Ids are returned once each, in
/// directory order.
pub fn resolve(text: &str, directory: &[Participant]) -> Vec<String> {
    directory
        .iter()
        .filter(|p| is_mentioned(text, &p.name))
        .map(|p| p.id.clone())
        .collect()
}

fn is_mentioned(text: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let token = format!("{}{}", TRIGGER, name);
    text.match_indices(&token).any(|(start, matched)| {
        text[start + matched.len()..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace)
    })
}

#[cfg(test)]
#[path = "mention_tests.rs"]
mod tests;
