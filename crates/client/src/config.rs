// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! All fields have defaults, so an empty TOML table is a valid config.

use std::time::Duration;

use cafe_core::{HistoryDisplay, PollCadence, ReconnectPolicy};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Tunables for the API client, the push channel and the pull path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_reconnect_base_ms")]
    pub reconnect_base_ms: u64,

    #[serde(default = "default_reconnect_cap_ms")]
    pub reconnect_cap_ms: u64,

    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Poll interval while a reply is pending.
    #[serde(default = "default_poll_interval_pending_ms")]
    pub poll_interval_pending_ms: u64,

    #[serde(default)]
    pub history_display: HistoryDisplay,
}

fn default_api_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_reconnect_base_ms() -> u64 {
    1000
}

fn default_reconnect_cap_ms() -> u64 {
    30_000
}

fn default_reconnect_max_attempts() -> u32 {
    5
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_poll_interval_pending_ms() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: default_api_url(),
            request_timeout_ms: default_request_timeout_ms(),
            reconnect_base_ms: default_reconnect_base_ms(),
            reconnect_cap_ms: default_reconnect_cap_ms(),
            reconnect_max_attempts: default_reconnect_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_interval_pending_ms: default_poll_interval_pending_ms(),
            history_display: HistoryDisplay::default(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `api_url` with every other field defaulted.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        ClientConfig {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            base: Duration::from_millis(self.reconnect_base_ms),
            cap: Duration::from_millis(self.reconnect_cap_ms),
            max_attempts: self.reconnect_max_attempts,
        }
    }

    pub fn poll_cadence(&self) -> PollCadence {
        PollCadence {
            idle: Duration::from_millis(self.poll_interval_ms),
            pending: Duration::from_millis(self.poll_interval_pending_ms),
        }
    }

    /// Parsed API base URL.
    pub fn api_base(&self) -> ClientResult<Url> {
        Url::parse(&self.api_url).map_err(|e| ClientError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Push-channel URL for a session: the API URL with `http` mapped to
    /// `ws` (`https` to `wss`) and `/sessions/{id}/ws` appended.
    pub fn push_url(&self, session_id: &str) -> ClientResult<String> {
        let mut url = self.api_base()?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(ClientError::InvalidUrl {
                    url: self.api_url.clone(),
                    reason: format!("unsupported scheme '{other}'"),
                })
            }
        };
        let invalid = |reason: &str| ClientError::InvalidUrl {
            url: self.api_url.clone(),
            reason: reason.to_string(),
        };
        url.set_scheme(scheme)
            .map_err(|()| invalid("cannot switch to a websocket scheme"))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base url"))?
            .pop_if_empty()
            .extend(["sessions", session_id, "ws"]);
        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
