// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for cafe-client operations.
//!
//! Push-channel failures are deliberately absent: they are handled inside
//! the transport manager and only ever show up as a link state.

use thiserror::Error;

/// Errors surfaced by the API client and the session lifecycle.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no active session\n  hint: open a session before sending")]
    NoActiveSession,

    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Core(#[from] cafe_core::Error),
}

/// A specialized Result type for cafe-client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
