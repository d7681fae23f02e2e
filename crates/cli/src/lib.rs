// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cafecli - terminal front end for the cafe chat server.
//!
//! Every command resolves a [`ClientConfig`](cafe_client::ClientConfig)
//! from the config file, `CAFE_API_URL` and `--api-url`, then talks to the
//! server through `cafe-client`. `chat` is the only long-running command;
//! the rest are single requests.

mod cli;
pub mod colors;
mod commands;
pub mod config;
mod display;
pub mod env;
pub mod error;
pub mod help;
pub mod logging;

pub use cli::{
    CatsCommand, Cli, Command, ConfigCommand, DisplayArg, ModesCommand, OutputArgs, OutputFormat,
    SessionsCommand,
};
pub use error::{Error, Result};

/// Runs one parsed invocation.
pub async fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.api_url)?;
    tracing::debug!(api_url = %config.api_url, "config resolved");

    match cli.command {
        Command::Chat { session } => commands::chat::run(config, session).await,
        Command::Send {
            session,
            content,
            output,
        } => commands::messages::send(&config, &session, &content, output.output).await,
        Command::Messages {
            session,
            page,
            limit,
            output,
        } => commands::messages::list(&config, &session, page, limit, output.output).await,
        Command::Stats { session, output } => {
            commands::messages::stats(&config, &session, output.output).await
        }
        Command::Sessions(cmd) => commands::sessions::run(&config, cmd).await,
        Command::Cats(cmd) => commands::cats::run(&config, cmd).await,
        Command::History {
            session,
            display,
            output,
        } => {
            commands::history::run(&config, &session, display.map(Into::into), output.output)
                .await
        }
        Command::Modes(cmd) => commands::modes::run(&config, cmd).await,
        Command::Config(cmd) => commands::config::run(&config, cmd),
    }
}
