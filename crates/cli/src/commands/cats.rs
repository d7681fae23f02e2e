// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cafe_client::ClientConfig;
use cafe_core::Participant;

use crate::cli::{CatsCommand, OutputFormat};
use crate::colors;
use crate::display::format_participant;
use crate::error::Result;

use super::{api, print_json};

/// Execute a cats subcommand.
pub async fn run(config: &ClientConfig, cmd: CatsCommand) -> Result<()> {
    let api = api(config)?;
    match cmd {
        CatsCommand::List { output } => {
            print_participants(&api.list_participants().await?, output.output)
        }
        CatsCommand::Available { output } => {
            print_participants(&api.available_participants().await?, output.output)
        }
        CatsCommand::Show { id, output } => {
            let participant = api.get_participant(&id).await?;
            match output.output {
                OutputFormat::Text => println!(
                    "{}",
                    format_participant(&participant, colors::should_colorize())
                ),
                OutputFormat::Json => print_json(&participant)?,
            }
            Ok(())
        }
    }
}

fn print_participants(participants: &[Participant], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => {
            if participants.is_empty() {
                println!("No participants.");
            }
            let colorize = colors::should_colorize();
            for participant in participants {
                println!("{}", format_participant(participant, colorize));
            }
        }
        OutputFormat::Json => print_json(participants)?,
    }
    Ok(())
}
