// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::{TimeZone, Utc};
use yare::parameterized;

fn record(id: &str, name: &str, minute: u32) -> CallHistory {
    CallHistory {
        participant_id: id.to_string(),
        participant_name: name.to_string(),
        session_id: "sess_abcd".to_string(),
        timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).unwrap(),
        prompt: Some(format!("prompt {}", minute)),
        response: None,
    }
}

fn records() -> Vec<CallHistory> {
    vec![
        record("a", "Mimi", 1),
        record("b", "Tom", 2),
        record("a", "Mimi", 3),
        record("a", "Mimi", 4),
    ]
}

#[test]
fn first_keeps_earliest_record_per_participant() {
    let groups = arrange(&records(), HistoryDisplay::First);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].participant_name, "Mimi");
    assert_eq!(groups[0].calls.len(), 1);
    assert_eq!(groups[0].calls[0].prompt.as_deref(), Some("prompt 1"));
    assert_eq!(groups[1].participant_name, "Tom");
}

#[test]
fn all_keeps_every_record_grouped() {
    let groups = arrange(&records(), HistoryDisplay::All);
    assert_eq!(groups.len(), 2);
    let minutes: Vec<Option<&str>> = groups[0]
        .calls
        .iter()
        .map(|c| c.prompt.as_deref())
        .collect();
    assert_eq!(
        minutes,
        vec![Some("prompt 1"), Some("prompt 3"), Some("prompt 4")]
    );
}

#[test]
fn empty_history_has_no_groups() {
    assert!(arrange(&[], HistoryDisplay::All).is_empty());
}

#[parameterized(
    first = { "first", HistoryDisplay::First },
    all = { "ALL", HistoryDisplay::All },
)]
fn history_display_from_str(input: &str, expected: HistoryDisplay) {
    assert_eq!(input.parse::<HistoryDisplay>().unwrap(), expected);
}

#[test]
fn history_display_rejects_unknown() {
    assert!("some".parse::<HistoryDisplay>().is_err());
}
