// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for client tests.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use cafe_core::{Message, MessageKind, Participant, ParticipantStatus, Sender, Session};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

pub fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_767_225_600 + seconds, 0).unwrap()
}

pub fn session(id: &str) -> Session {
    Session {
        id: id.to_string(),
        name: format!("Session {id}"),
        summary: String::new(),
        updated_at: at(0),
        message_count: 0,
    }
}

pub fn user_message(id: &str, session_id: &str) -> Message {
    Message {
        id: id.to_string(),
        kind: MessageKind::User,
        content: format!("hello from {id}"),
        sender: None,
        timestamp: at(1),
        session_id: session_id.to_string(),
    }
}

pub fn agent_message(id: &str, session_id: &str) -> Message {
    Message {
        kind: MessageKind::Agent,
        sender: Some(Sender {
            id: "cat-1".into(),
            name: "Mochi".into(),
            avatar: String::new(),
            color: Some("#ffaa00".into()),
        }),
        ..user_message(id, session_id)
    }
}

pub fn participant(id: &str, name: &str) -> Participant {
    Participant {
        id: id.to_string(),
        name: name.to_string(),
        avatar: String::new(),
        color: "#ffaa00".into(),
        status: ParticipantStatus::Idle,
    }
}

/// Receives the next value or fails after a generous timeout.
pub async fn next<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap()
}
