// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cafe_client::ClientConfig;
use cafe_core::history::{self, HistoryDisplay};
use chrono::Utc;

use crate::cli::OutputFormat;
use crate::display::format_history;
use crate::error::Result;

use super::{api, print_json, session_error};

/// Prints the call history of a session. `display` falls back to the
/// configured default.
pub async fn run(
    config: &ClientConfig,
    session: &str,
    display: Option<HistoryDisplay>,
    output: OutputFormat,
) -> Result<()> {
    let records = api(config)?
        .call_history(session)
        .await
        .map_err(session_error(session))?;
    match output {
        OutputFormat::Text => {
            let groups = history::arrange(&records, display.unwrap_or(config.history_display));
            if groups.is_empty() {
                println!("No participant has been called in this session.");
            }
            for line in format_history(&groups, Utc::now()) {
                println!("{line}");
            }
        }
        OutputFormat::Json => print_json(&records)?,
    }
    Ok(())
}
