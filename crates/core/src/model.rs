// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core data types shared by the sync engine and its front ends.
//!
//! Field names follow the backend's JSON (camelCase). Agent participants are
//! called "cats" on the wire, which is why a few serde renames point there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A persistent conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub message_count: u64,
}

/// Presence of a participant, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Idle,
    Busy,
    Offline,
}

impl ParticipantStatus {
    /// Returns the string representation used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Idle => "idle",
            ParticipantStatus::Busy => "busy",
            ParticipantStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ParticipantStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(ParticipantStatus::Idle),
            "busy" => Ok(ParticipantStatus::Busy),
            "offline" => Ok(ParticipantStatus::Offline),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// An autonomous chat agent in the participant directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub color: String,
    pub status: ParticipantStatus,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Written by the human user.
    User,
    /// Written by a participant. Serialized as `cat`.
    #[serde(rename = "cat", alias = "agent")]
    Agent,
    /// Generated by the server.
    System,
}

impl MessageKind {
    /// Returns the string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Agent => "cat",
            MessageKind::System => "system",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageKind::User),
            "cat" | "agent" => Ok(MessageKind::Agent),
            "system" => Ok(MessageKind::System),
            _ => Err(Error::InvalidMessageKind(s.to_string())),
        }
    }
}

/// Lightweight author descriptor attached to a message.
///
/// Participants carry a color; the user descriptor does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One entry of a session timeline. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

impl Message {
    /// True when a participant wrote this message.
    pub fn is_from_agent(&self) -> bool {
        self.kind == MessageKind::Agent
    }

    /// Display name of the author, falling back to the kind.
    pub fn author(&self) -> &str {
        match &self.sender {
            Some(sender) => &sender.name,
            None => self.kind.as_str(),
        }
    }
}

/// Per-session message counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    pub total_messages: u64,
    #[serde(rename = "catMessages")]
    pub agent_messages: u64,
}

/// Audit entry of one exchange between the server and a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHistory {
    #[serde(rename = "catId")]
    pub participant_id: String,
    #[serde(rename = "catName")]
    pub participant_name: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// An operating mode the server offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Mode configuration. Everything beyond `name`/`enabled` is opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Mode runtime state, owned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeState {
    #[serde(default, alias = "custom_state")]
    pub custom_state: serde_json::Map<String, serde_json::Value>,
    #[serde(default, alias = "last_update_time")]
    pub last_update_time: Option<String>,
}

/// The mode a session is currently running in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMode {
    pub mode: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: ModeConfig,
    #[serde(default)]
    pub state: ModeState,
}

/// Human-readable name for a mode identifier.
pub fn mode_display_name(mode: &str) -> &str {
    match mode {
        "free_discussion" => "Free discussion",
        "ipd_dev" => "IPD development",
        other => other,
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
