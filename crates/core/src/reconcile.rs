// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Timeline reconciliation rules.
//!
//! A session's timeline is fed by two paths that know nothing about each
//! other:
//!
//! - **push**: single messages from the socket, merged by id (a message the
//!   pull path already surfaced is dropped)
//! - **pull**: the full list from a periodic fetch, which replaces the
//!   timeline wholesale
//!
//! Pulls are numbered. A pull only applies if its number is newer than the
//! last applied one, so a slow fetch that resolves late cannot overwrite a
//! fresher list.

use std::time::Duration;

use crate::model::Message;

/// Poll intervals for the pull path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    /// Interval while nothing is awaited.
    pub idle: Duration,
    /// Interval while a reply is pending.
    pub pending: Duration,
}

impl Default for PollCadence {
    fn default() -> Self {
        PollCadence {
            idle: Duration::from_millis(3000),
            pending: Duration::from_millis(1000),
        }
    }
}

impl PollCadence {
    /// The interval to wait before the next pull.
    pub fn interval(&self, reply_pending: bool) -> Duration {
        if reply_pending {
            self.pending
        } else {
            self.idle
        }
    }
}

/// Appends a pushed message unless its id is already in the timeline.
///
/// Returns `None` for a duplicate so the caller can keep the old timeline.
pub fn merge_pushed(timeline: &[Message], message: &Message) -> Option<Vec<Message>> {
    if timeline.iter().any(|m| m.id == message.id) {
        return None;
    }
    let mut merged = Vec::with_capacity(timeline.len() + 1);
    merged.extend_from_slice(timeline);
    merged.push(message.clone());
    Some(merged)
}

/// True when the last message of a pulled timeline came from a participant,
/// meaning the reply the user was waiting for has arrived.
pub fn reply_arrived(timeline: &[Message]) -> bool {
    timeline.last().is_some_and(Message::is_from_agent)
}

/// Whether pull number `seq` may replace a timeline last replaced by pull
/// number `applied`.
pub fn pull_is_fresh(applied: u64, seq: u64) -> bool {
    seq > applied
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
