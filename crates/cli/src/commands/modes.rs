// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cafe_client::ClientConfig;
use cafe_core::ModeConfig;

use crate::cli::{ModesCommand, OutputFormat};
use crate::display::{format_mode, format_session_mode};
use crate::error::Result;

use super::{api, print_json, session_error};

/// Execute a modes subcommand.
pub async fn run(config: &ClientConfig, cmd: ModesCommand) -> Result<()> {
    let api = api(config)?;
    match cmd {
        ModesCommand::List { output } => {
            let modes = api.list_modes().await?;
            match output.output {
                OutputFormat::Text => {
                    for mode in &modes {
                        if mode.description.is_empty() {
                            println!("{}", format_mode(&mode.name));
                        } else {
                            println!("{}: {}", format_mode(&mode.name), mode.description);
                        }
                    }
                }
                OutputFormat::Json => print_json(&modes)?,
            }
        }
        ModesCommand::Show { session, output } => {
            let mode = api
                .session_mode(&session)
                .await
                .map_err(session_error(&session))?;
            match output.output {
                OutputFormat::Text => println!("{}", format_session_mode(&mode)),
                OutputFormat::Json => print_json(&mode)?,
            }
        }
        ModesCommand::Set {
            session,
            mode,
            config,
        } => {
            let mode_config = config.as_deref().map(parse_mode_config).transpose()?;
            let updated = api
                .set_session_mode(&session, &mode, mode_config.as_ref())
                .await
                .map_err(session_error(&session))?;
            println!("Session {session} is now in {}", format_mode(&updated.mode));
        }
    }
    Ok(())
}

fn parse_mode_config(json: &str) -> Result<ModeConfig> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
#[path = "modes_tests.rs"]
mod tests;
