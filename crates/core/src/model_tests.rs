// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    user = { "user", MessageKind::User },
    cat = { "cat", MessageKind::Agent },
    agent = { "agent", MessageKind::Agent },
    system = { "SYSTEM", MessageKind::System },
)]
fn message_kind_from_str(input: &str, expected: MessageKind) {
    assert_eq!(input.parse::<MessageKind>().unwrap(), expected);
}

#[test]
fn message_kind_rejects_unknown() {
    assert!(matches!(
        "bot".parse::<MessageKind>(),
        Err(Error::InvalidMessageKind(_))
    ));
}

#[parameterized(
    idle = { "idle", ParticipantStatus::Idle },
    busy = { "Busy", ParticipantStatus::Busy },
    offline = { "offline", ParticipantStatus::Offline },
)]
fn participant_status_from_str(input: &str, expected: ParticipantStatus) {
    assert_eq!(input.parse::<ParticipantStatus>().unwrap(), expected);
}

#[test]
fn message_decodes_backend_json() {
    let json = r##"{
        "id": "msg_1",
        "type": "cat",
        "content": "meow",
        "sender": {"id": "a", "name": "Mimi", "avatar": "mimi.png", "color": "#ff0"},
        "timestamp": "2026-01-02T03:04:05.123456789Z",
        "sessionId": "sess_1"
    }"##;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg.kind, MessageKind::Agent);
    assert!(msg.is_from_agent());
    assert_eq!(msg.author(), "Mimi");
    assert_eq!(msg.session_id, "sess_1");
    assert_eq!(msg.sender.unwrap().color.as_deref(), Some("#ff0"));
}

#[test]
fn message_without_sender_uses_kind_as_author() {
    let json = r#"{"id":"m","type":"system","content":"hi","timestamp":"2026-01-02T03:04:05Z","sessionId":"s"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert!(msg.sender.is_none());
    assert_eq!(msg.author(), "system");
}

#[test]
fn message_kind_serializes_as_cat() {
    assert_eq!(
        serde_json::to_string(&MessageKind::Agent).unwrap(),
        "\"cat\""
    );
}

#[test]
fn session_tolerates_missing_optional_fields() {
    let json = r#"{"id":"s1","name":"Morning","updatedAt":"2026-01-02T03:04:05Z"}"#;
    let session: Session = serde_json::from_str(json).unwrap();
    assert_eq!(session.summary, "");
    assert_eq!(session.message_count, 0);
}

#[test]
fn stats_use_cat_messages_field() {
    let stats: MessageStats =
        serde_json::from_str(r#"{"totalMessages": 12, "catMessages": 7}"#).unwrap();
    assert_eq!(stats.total_messages, 12);
    assert_eq!(stats.agent_messages, 7);
}

#[test]
fn call_history_payloads_are_optional() {
    let json = r#"{"catId":"a","catName":"Mimi","sessionId":"s","timestamp":"2026-01-02T03:04:05Z"}"#;
    let record: CallHistory = serde_json::from_str(json).unwrap();
    assert_eq!(record.participant_id, "a");
    assert!(record.prompt.is_none());
    assert!(record.response.is_none());
}

#[test]
fn session_mode_keeps_opaque_config() {
    let json = r#"{
        "mode": "free_discussion",
        "description": "anyone may speak",
        "config": {"name": "free_discussion", "enabled": true, "max_rounds": 3},
        "state": {"custom_state": {"round": 1}, "last_update_time": "2026-01-02T03:04:05Z"}
    }"#;
    let mode: SessionMode = serde_json::from_str(json).unwrap();
    assert!(mode.config.enabled);
    assert_eq!(mode.config.extra["max_rounds"], 3);
    assert_eq!(mode.state.custom_state["round"], 1);
    assert!(mode.state.last_update_time.is_some());
}

#[parameterized(
    free = { "free_discussion", "Free discussion" },
    ipd = { "ipd_dev", "IPD development" },
    unknown = { "debate", "debate" },
)]
fn mode_display_names(mode: &str, expected: &str) {
    assert_eq!(mode_display_name(mode), expected);
}
