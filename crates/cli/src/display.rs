// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text rendering of sessions, messages, participants and the chat
//! screen. Nothing here touches the terminal.

use cafe_core::history::HistoryGroup;
use cafe_core::model::mode_display_name;
use cafe_core::{Message, MessageStats, Participant, Session, SessionMode, State};
use chrono::{DateTime, Utc};

use crate::colors;

/// Most mention candidates the chat screen lists at once.
pub const MENU_ROWS: usize = 5;

/// Age of a timestamp relative to `now`, in the coarsest fitting unit.
///
/// Timestamps in the future count as zero minutes old.
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

/// Shortens long ids to their prefix and last four characters.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 12 {
        return id.to_string();
    }
    let prefix: String = match id.find('_') {
        Some(pos) if pos < 8 => id[..=pos].to_string(),
        _ => chars[..4].iter().collect(),
    };
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{tail}")
}

pub fn format_session(session: &Session, now: DateTime<Utc>) -> String {
    format!(
        "{}  {}  ({} messages, {})",
        session.id,
        session.name,
        session.message_count,
        relative_age(session.updated_at, now)
    )
}

/// One timeline entry. Continuation lines of multi-line content are
/// indented under the author.
pub fn format_message(message: &Message, colorize: bool) -> String {
    let time = message.timestamp.format("%H:%M");
    let author = message.author();
    let author = match message.sender.as_ref().and_then(|s| s.color.as_deref()) {
        Some(color) if colorize => colors::participant(color, author),
        _ => author.to_string(),
    };
    let mut lines = message.content.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("[{time}] {author}: {first}");
    for line in lines {
        out.push_str("\n        ");
        out.push_str(line);
    }
    out
}

pub fn format_participant(participant: &Participant, colorize: bool) -> String {
    let (name, status) = if colorize {
        (
            colors::participant(&participant.color, &participant.name),
            colors::status(participant.status, participant.status.as_str()),
        )
    } else {
        (
            participant.name.clone(),
            participant.status.as_str().to_string(),
        )
    };
    let avatar = if participant.avatar.is_empty() {
        String::new()
    } else {
        format!("{} ", participant.avatar)
    };
    format!("{avatar}{name} ({}) - {status}", participant.id)
}

pub fn format_stats(stats: &MessageStats) -> String {
    format!(
        "{} messages ({} from participants)",
        stats.total_messages, stats.agent_messages
    )
}

/// Mode name followed by its identifier, unless they are the same.
pub fn format_mode(mode: &str) -> String {
    let name = mode_display_name(mode);
    if name == mode {
        mode.to_string()
    } else {
        format!("{name} ({mode})")
    }
}

pub fn format_session_mode(mode: &SessionMode) -> String {
    let mut out = format_mode(&mode.mode);
    if !mode.description.is_empty() {
        out.push_str(": ");
        out.push_str(&mode.description);
    }
    out
}

/// Call history rows. Groups with more than one call list every call
/// under a header; single calls take one line.
pub fn format_history(groups: &[HistoryGroup], now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        match group.calls.as_slice() {
            [] => {}
            [call] => lines.push(format!(
                "{}  {}  {}",
                group.participant_name,
                short_id(&call.session_id),
                relative_age(call.timestamp, now)
            )),
            calls => {
                lines.push(format!("{} ({} calls)", group.participant_name, calls.len()));
                for call in calls {
                    lines.push(format!(
                        "  {}  {}",
                        short_id(&call.session_id),
                        relative_age(call.timestamp, now)
                    ));
                }
            }
        }
    }
    lines
}

/// A rendered chat screen with the cursor position inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatScreen {
    pub lines: Vec<String>,
    pub cursor: (u16, u16),
}

/// Lays out the interactive view: header, timeline tail, mention menu and
/// input. Returns exactly `height` lines, each at most `width` characters.
pub fn chat_screen(state: &State, status: Option<&str>, width: u16, height: u16) -> ChatScreen {
    let width = usize::from(width.max(1));
    let height = usize::from(height.max(1));

    let mut header = Vec::with_capacity(3);
    let title = match &state.active_session {
        Some(session) => session.name.clone(),
        None => "no session".to_string(),
    };
    let mut top = format!("{title} | {}", state.link);
    if let Some(mode) = &state.session_mode {
        top.push_str(" | ");
        top.push_str(mode_display_name(&mode.mode));
    }
    header.push(top);
    let mut second = state.stats.as_ref().map(format_stats).unwrap_or_default();
    if state.reply_pending {
        if !second.is_empty() {
            second.push_str(" | ");
        }
        second.push_str("waiting for a reply...");
    }
    if let Some(status) = status {
        if !second.is_empty() {
            second.push_str(" | ");
        }
        second.push_str(status);
    }
    header.push(second);
    header.push("-".repeat(width));

    let composer = &state.composer;
    let candidates = composer.menu().candidates(&state.participants);
    let highlighted = composer.menu().highlighted;
    // Keep the highlight visible when it moves past the first page.
    let first_row = highlighted.saturating_sub(MENU_ROWS - 1);
    let menu: Vec<String> = candidates
        .iter()
        .enumerate()
        .skip(first_row)
        .take(MENU_ROWS)
        .map(|(i, p)| {
            let marker = if i == highlighted { ">" } else { " " };
            format!("{marker} @{} ({})", p.name, p.status)
        })
        .collect();

    let before_cursor: String = composer.text().chars().take(composer.cursor()).collect();
    let cursor_row = before_cursor.matches('\n').count();
    let cursor_col = before_cursor
        .rsplit('\n')
        .next()
        .map_or(0, |line| line.chars().count())
        + 2;
    let input: Vec<String> = composer
        .text()
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let prompt = if i == 0 { "> " } else { "  " };
            format!("{prompt}{line}")
        })
        .collect();

    let reserved = header.len() + menu.len() + input.len();
    let timeline_rows = height.saturating_sub(reserved);
    let timeline: Vec<String> = if state.active_session.is_none() {
        vec!["Open a session to start chatting.".to_string()]
    } else {
        state
            .timeline
            .iter()
            .flat_map(|m| {
                format_message(m, false)
                    .lines()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    };
    let tail = &timeline[timeline.len().saturating_sub(timeline_rows)..];

    let mut lines: Vec<String> = header;
    lines.extend(tail.iter().cloned());
    let filler = height.saturating_sub(lines.len() + menu.len() + input.len());
    lines.extend(std::iter::repeat(String::new()).take(filler));
    lines.extend(menu);
    let input_top = lines.len();
    lines.extend(input);

    // Input that outgrows the screen pushes the header off the top.
    let overflow = lines.len().saturating_sub(height);
    let lines: Vec<String> = lines
        .into_iter()
        .skip(overflow)
        .map(|line| fit(&line, width))
        .collect();

    let row = (input_top + cursor_row).saturating_sub(overflow);
    let cursor = (
        u16::try_from(cursor_col.min(width - 1)).unwrap_or(u16::MAX),
        u16::try_from(row.min(height - 1)).unwrap_or(u16::MAX),
    );
    ChatScreen { lines, cursor }
}

fn fit(line: &str, width: usize) -> String {
    line.chars().take(width).collect()
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
