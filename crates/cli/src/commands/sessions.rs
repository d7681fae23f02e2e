// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cafe_client::ClientConfig;
use chrono::Utc;

use crate::cli::{OutputFormat, SessionsCommand};
use crate::display::format_session;
use crate::error::Result;

use super::{api, confirm, print_json, session_error};

/// Execute a sessions subcommand.
pub async fn run(config: &ClientConfig, cmd: SessionsCommand) -> Result<()> {
    let api = api(config)?;
    match cmd {
        SessionsCommand::List { output } => {
            let sessions = api.list_sessions().await?;
            match output.output {
                OutputFormat::Text => {
                    if sessions.is_empty() {
                        println!("No sessions yet. Create one with 'cafe sessions new'.");
                    }
                    let now = Utc::now();
                    for session in &sessions {
                        println!("{}", format_session(session, now));
                    }
                }
                OutputFormat::Json => print_json(&sessions)?,
            }
        }
        SessionsCommand::New { output } => {
            let session = api.create_session().await?;
            match output.output {
                OutputFormat::Text => println!("Created session {} ({})", session.id, session.name),
                OutputFormat::Json => print_json(&session)?,
            }
        }
        SessionsCommand::Show { session, output } => {
            let found = api
                .get_session(&session)
                .await
                .map_err(session_error(&session))?;
            match output.output {
                OutputFormat::Text => {
                    println!("{}", format_session(&found, Utc::now()));
                    if !found.summary.is_empty() {
                        println!();
                        println!("{}", found.summary);
                    }
                }
                OutputFormat::Json => print_json(&found)?,
            }
        }
        SessionsCommand::Rename { session, name } => {
            let renamed = api
                .rename_session(&session, &name)
                .await
                .map_err(session_error(&session))?;
            println!("Renamed {} to {}", renamed.id, renamed.name);
        }
        SessionsCommand::Delete { session, yes } => {
            if !yes && !confirm(&format!("Delete session {session}?"))? {
                println!("Aborted.");
                return Ok(());
            }
            api.delete_session(&session)
                .await
                .map_err(session_error(&session))?;
            println!("Deleted session {session}");
        }
    }
    Ok(())
}

