// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Log output routing.
//!
//! Logs go to stderr, except while `cafe chat` holds the terminal in raw
//! mode. There they are appended to [`config::chat_log_path`] so nothing
//! draws over the screen.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::cli::Command;
use crate::{config, env};

/// Where log lines end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

impl LogTarget {
    /// Picks the target for a command.
    pub fn for_command(command: &Command) -> Self {
        match command {
            Command::Chat { .. } => config::chat_log_path().map_or(LogTarget::Discard, LogTarget::File),
            _ => LogTarget::Stderr,
        }
    }
}

/// `CAFE_LOG` wins; otherwise `debug` with `--verbose` and `warn` without.
pub fn filter(verbose: bool) -> EnvFilter {
    match env::log_filter() {
        Some(directives) => EnvFilter::new(directives),
        None if verbose => EnvFilter::new("debug"),
        None => EnvFilter::new("warn"),
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. A log file that cannot be opened
/// silences logging rather than falling back to the terminal.
pub fn init(verbose: bool, target: LogTarget) {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(verbose));
    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File(path) => match open_append(&path) {
            Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
            Err(_) => builder.with_writer(std::io::sink).init(),
        },
        LogTarget::Discard => builder.with_writer(std::io::sink).init(),
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
