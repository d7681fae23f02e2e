// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use cafe_client::ClientConfig;

use crate::cli::ConfigCommand;
use crate::config::{resolve_path, save_to};
use crate::error::{Error, Result};

/// Execute a config subcommand.
pub fn run(config: &ClientConfig, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigCommand::Path => match resolve_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("no config directory on this platform"),
        },
        ConfigCommand::Init { force } => {
            let path = resolve_path().ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no config directory on this platform; set CAFE_CONFIG",
                ))
            })?;
            if path.exists() && !force {
                println!("{} already exists (use --force to overwrite)", path.display());
                return Ok(());
            }
            save_to(config, &path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
