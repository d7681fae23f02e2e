// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn defaults_match_documented_values() {
    let config = ClientConfig::default();
    assert_eq!(config.api_url, "http://localhost:8080/api");
    assert_eq!(config.request_timeout(), Duration::from_secs(10));
    assert_eq!(config.reconnect_policy(), ReconnectPolicy::default());
    assert_eq!(config.poll_cadence(), PollCadence::default());
    assert_eq!(config.history_display, HistoryDisplay::First);
}

#[test]
fn empty_json_uses_defaults() {
    let config: ClientConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn partial_json_overrides_only_given_fields() {
    let config: ClientConfig =
        serde_json::from_str(r#"{"poll_interval_ms": 500, "history_display": "all"}"#).unwrap();
    assert_eq!(config.poll_cadence().idle, Duration::from_millis(500));
    assert_eq!(config.poll_cadence().pending, Duration::from_millis(1000));
    assert_eq!(config.history_display, HistoryDisplay::All);
    assert_eq!(config.api_url, "http://localhost:8080/api");
}

#[test]
fn reconnect_policy_from_fields() {
    let config = ClientConfig {
        reconnect_base_ms: 10,
        reconnect_cap_ms: 50,
        reconnect_max_attempts: 2,
        ..ClientConfig::default()
    };
    let policy = config.reconnect_policy();
    assert_eq!(policy.delay(0), Duration::from_millis(10));
    assert_eq!(policy.delay(5), Duration::from_millis(50));
    assert_eq!(policy.max_attempts, 2);
}

#[parameterized(
    http = { "http://localhost:8080/api", "ws://localhost:8080/api/sessions/s1/ws" },
    https = { "https://cafe.example.com/api", "wss://cafe.example.com/api/sessions/s1/ws" },
    trailing_slash = { "http://localhost:8080/api/", "ws://localhost:8080/api/sessions/s1/ws" },
    root = { "http://127.0.0.1:3000", "ws://127.0.0.1:3000/sessions/s1/ws" },
    already_ws = { "ws://localhost/api", "ws://localhost/api/sessions/s1/ws" },
)]
fn push_url_for(api_url: &str, expected: &str) {
    let config = ClientConfig::with_api_url(api_url);
    assert_eq!(config.push_url("s1").unwrap(), expected);
}

#[parameterized(
    bad_scheme = { "ftp://localhost/api" },
    not_a_url = { "localhost:8080" },
    garbage = { "::::" },
)]
fn push_url_rejects(api_url: &str) {
    let config = ClientConfig::with_api_url(api_url);
    assert!(matches!(
        config.push_url("s1"),
        Err(ClientError::InvalidUrl { .. })
    ));
}
