// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot timeline commands: `messages`, `send` and `stats`.

use cafe_client::ClientConfig;
use cafe_core::mention;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::colors;
use crate::display::{format_message, format_stats};
use crate::error::{Error, Result};

use super::{api, print_json, session_error};

pub async fn list(
    config: &ClientConfig,
    session: &str,
    page: u32,
    limit: u32,
    output: OutputFormat,
) -> Result<()> {
    let messages = api(config)?
        .list_messages(session, page, limit)
        .await
        .map_err(session_error(session))?;
    match output {
        OutputFormat::Text => {
            if messages.is_empty() {
                println!("No messages.");
            }
            let colorize = colors::should_colorize();
            for message in &messages {
                println!("{}", format_message(message, colorize));
            }
        }
        OutputFormat::Json => print_json(&messages)?,
    }
    Ok(())
}

/// Sends `words` joined by spaces, mentioning every participant named
/// with `@<name>`.
pub async fn send(
    config: &ClientConfig,
    session: &str,
    words: &[String],
    output: OutputFormat,
) -> Result<()> {
    let content = words.join(" ");
    if content.trim().is_empty() {
        return Err(Error::EmptyMessage);
    }
    let api = api(config)?;
    let mentions = if content.contains(mention::TRIGGER) {
        let directory = api.list_participants().await?;
        mention::resolve(&content, &directory)
    } else {
        Vec::new()
    };
    debug!(session, ?mentions, "sending");
    let message = api
        .send_message(session, &content, &mentions)
        .await
        .map_err(session_error(session))?;
    match output {
        OutputFormat::Text => println!("{}", format_message(&message, colors::should_colorize())),
        OutputFormat::Json => print_json(&message)?,
    }
    Ok(())
}

pub async fn stats(config: &ClientConfig, session: &str, output: OutputFormat) -> Result<()> {
    let stats = api(config)?
        .message_stats(session)
        .await
        .map_err(session_error(session))?;
    match output {
        OutputFormat::Text => println!("{}", format_stats(&stats)),
        OutputFormat::Json => print_json(&stats)?,
    }
    Ok(())
}
