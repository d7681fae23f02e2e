// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use clap::builder::styling::Styles;

use crate::colors;

/// Clap styles matching the listing colors.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let header = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::HEADER))));
    let literal = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::LITERAL))));
    let context = Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(colors::codes::CONTEXT))));

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
}

/// Main help template.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        header("Options:")
    )
}

fn header(text: &str) -> String {
    if colors::should_colorize() {
        colors::header(text)
    } else {
        text.to_string()
    }
}

fn literal(text: &str) -> String {
    if colors::should_colorize() {
        colors::literal(text)
    } else {
        text.to_string()
    }
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_chat}
  {chat}      Open a session interactively
  {send}      Send one message
  {messages}  Print a session timeline

{header_sessions}
  {sessions}  List, create, rename and delete sessions
  {cats}      Show the participant directory
  {stats}     Show message counts of a session
  {history}   Show participant call history of a session
  {modes}     Show or switch session modes
  {config}    Show or write configuration
",
        header_chat = header("Chat:"),
        header_sessions = header("Sessions & Directory:"),
        chat = literal("chat"),
        send = literal("send"),
        messages = literal("messages"),
        sessions = literal("sessions"),
        cats = literal("cats"),
        stats = literal("stats"),
        history = literal("history"),
        modes = literal("modes"),
        config = literal("config"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    format!(
        "\
{}
  cafe sessions new              Create a session
  cafe chat <session>            Talk in it
  cafe send <session> \"@Mochi hi\" Mention a participant",
        header("Get started:")
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
