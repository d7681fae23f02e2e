// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for cafe-core operations.

use thiserror::Error;

/// All possible errors that can occur in cafe-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid message kind: '{0}'\n  hint: valid kinds are: user, cat, system")]
    InvalidMessageKind(String),

    #[error("invalid participant status: '{0}'\n  hint: valid statuses are: idle, busy, offline")]
    InvalidStatus(String),

    #[error("invalid history display: '{0}'\n  hint: valid displays are: first, all")]
    InvalidHistoryDisplay(String),

    #[error("malformed {kind} envelope: {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cursor {cursor} is past the end of the input ({len} chars)")]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for cafe-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
