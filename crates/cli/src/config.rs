// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration.
//!
//! The config file is TOML holding the fields of [`ClientConfig`]:
//!
//! ```toml
//! api_url = "https://cafe.example.com/api"
//! poll_interval_ms = 3000
//! history_display = "all"
//! ```
//!
//! Lookup order: `$CAFE_CONFIG`, then `<config dir>/cafe/config.toml`,
//! then built-in defaults. `CAFE_API_URL` and `--api-url` override
//! `api_url`, in that order.

use std::fs;
use std::path::{Path, PathBuf};

use cafe_client::ClientConfig;
use tracing::debug;

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "cafe";
const CONFIG_FILE_NAME: &str = "config.toml";
const CHAT_LOG_FILE_NAME: &str = "chat.log";

/// Default location of the config file, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Where `cafe chat` writes its log while it owns the terminal.
pub fn chat_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join(APP_DIR_NAME).join(CHAT_LOG_FILE_NAME))
}

/// The config file that applies, whether or not it exists.
pub fn resolve_path() -> Option<PathBuf> {
    env::config_path().or_else(default_path)
}

/// Reads a config file. A missing file yields defaults.
pub fn load_from(path: &Path) -> Result<ClientConfig> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(ClientConfig::default());
        }
        Err(source) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a config file, creating parent directories.
pub fn save_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}

/// Applies URL overrides. `flag` wins over `env`.
pub fn apply_overrides(
    mut config: ClientConfig,
    env: Option<String>,
    flag: Option<String>,
) -> ClientConfig {
    if let Some(url) = flag.or(env) {
        config.api_url = url;
    }
    config
}

/// Loads the effective config for this invocation.
pub fn load(api_url_flag: Option<String>) -> Result<ClientConfig> {
    let config = match resolve_path() {
        Some(path) => load_from(&path)?,
        None => ClientConfig::default(),
    };
    Ok(apply_overrides(config, env::api_url(), api_url_flag))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
