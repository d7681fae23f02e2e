// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod cats;
pub mod chat;
pub mod config;
pub mod history;
pub mod messages;
pub mod modes;
pub mod sessions;

use std::io::{BufRead, IsTerminal, Write};

use cafe_client::{ApiClient, ClientConfig, ClientError};
use serde::Serialize;

use crate::error::{Error, Result};

/// Builds an API client for one-shot commands.
pub fn api(config: &ClientConfig) -> Result<ApiClient> {
    Ok(ApiClient::new(config)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turns a 404 from a session endpoint into [`Error::SessionNotFound`].
pub fn session_error(session_id: &str) -> impl FnOnce(ClientError) -> Error + '_ {
    move |err| match err {
        ClientError::Status { status, .. } if status.as_u16() == 404 => {
            Error::SessionNotFound(session_id.to_string())
        }
        other => Error::Client(other),
    }
}

/// Asks a y/N question on the terminal.
///
/// Fails with [`Error::ConfirmationRequired`] when stdin is not a terminal.
pub fn confirm(prompt: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return Err(Error::ConfirmationRequired);
    }
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
