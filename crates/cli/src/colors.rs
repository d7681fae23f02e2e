// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal colors for help and listings.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use cafe_core::ParticipantStatus;

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: pastel cyan/steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Timestamps, ids, hints: medium grey
    pub const CONTEXT: u8 = 245;
    pub const IDLE: u8 = 71;
    pub const BUSY: u8 = 179;
    pub const OFFLINE: u8 = 241;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    format!("{}{}{}", fg256(code), text, RESET)
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

pub fn status(status: ParticipantStatus, text: &str) -> String {
    let code = match status {
        ParticipantStatus::Idle => codes::IDLE,
        ParticipantStatus::Busy => codes::BUSY,
        ParticipantStatus::Offline => codes::OFFLINE,
    };
    paint(code, text)
}

/// Parses `#rrggbb` (or `rrggbb`) into its components.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Paints `text` in a participant's own color, if it parses.
pub fn participant(color: &str, text: &str) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}{RESET}"),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
