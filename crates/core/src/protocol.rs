// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push-channel envelopes.
//!
//! The server wraps every push event as
//! `{"type": ..., "sessionId": ..., "data": ..., "timestamp": ...}`.
//! Decoding turns the discriminant into a [`PushEvent`] with a concrete
//! payload type. Discriminants this client does not act on decode to
//! [`PushEvent::Ignored`] so newer servers never break older clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{CallHistory, Message};

/// Wire shape shared by every discriminant.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

/// A decoded push event.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// A timeline message (`type: "message"`).
    Message(Message),
    /// The session's call history (`type: "history"`).
    History(Vec<CallHistory>),
    /// Any discriminant without handling here, including `stats` and `cats`.
    Ignored { kind: String },
}

impl PushEvent {
    /// The wire discriminant this event was decoded from.
    pub fn kind(&self) -> &str {
        match self {
            PushEvent::Message(_) => "message",
            PushEvent::History(_) => "history",
            PushEvent::Ignored { kind } => kind,
        }
    }
}

/// A push event together with its routing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub session_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub event: PushEvent,
}

impl Envelope {
    /// Creates a `message` envelope.
    pub fn message(message: Message) -> Self {
        Envelope {
            session_id: Some(message.session_id.clone()),
            timestamp: Some(message.timestamp),
            event: PushEvent::Message(message),
        }
    }

    /// Creates a `history` envelope.
    pub fn history(session_id: impl Into<String>, records: Vec<CallHistory>) -> Self {
        Envelope {
            session_id: Some(session_id.into()),
            timestamp: None,
            event: PushEvent::History(records),
        }
    }

    /// Decodes an envelope from a text frame.
    ///
    /// Fails only when the frame is not an envelope at all, or when a
    /// `message`/`history` payload does not match its schema.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawEnvelope = serde_json::from_str(text)?;
        let event = match raw.kind.as_str() {
            "message" => PushEvent::Message(decode_payload(&raw.kind, raw.data)?),
            "history" => PushEvent::History(decode_payload(&raw.kind, raw.data)?),
            _ => PushEvent::Ignored { kind: raw.kind },
        };
        Ok(Envelope {
            session_id: raw.session_id,
            timestamp: raw.timestamp,
            event,
        })
    }

    /// Serializes the envelope to its wire form.
    ///
    /// Ignored events carry no payload.
    pub fn to_json(&self) -> Result<String> {
        let data = match &self.event {
            PushEvent::Message(message) => serde_json::to_value(message)?,
            PushEvent::History(records) => serde_json::to_value(records)?,
            PushEvent::Ignored { .. } => serde_json::Value::Null,
        };
        let raw = RawEnvelope {
            kind: self.event.kind().to_string(),
            session_id: self.session_id.clone(),
            data,
            timestamp: self.timestamp,
        };
        Ok(serde_json::to_string(&raw)?)
    }
}

fn decode_payload<T: serde::de::DeserializeOwned>(kind: &str, data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|source| Error::MalformedPayload {
        kind: kind.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
