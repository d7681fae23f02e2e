// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnection state machine for the push channel.
//!
//! ```text
//!            connect()            socket open
//!   Idle ───────────────► Connecting ───────────► Open
//!    ▲                      ▲    │                  │
//!    │ disconnect()         │    │ error/close      │ error/close
//!    │ (from any state)     │    ▼                  ▼
//!    │                  delay elapsed ◄──── Retrying{attempt, delay}
//!    │                                          │
//!    │                              attempts == max
//!    │                                          ▼
//!    └───────────────────────────────────── GivenUp
//! ```
//!
//! The machine holds no timers. It tells the caller how long to wait and the
//! caller reports back with [`Reconnector::retry_due`].

use std::fmt;
use std::time::Duration;

/// Backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before the first retry.
    pub base: Duration,
    /// Upper bound for any single delay.
    pub cap: Duration,
    /// Retries allowed before giving up.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy {
            base: Duration::from_millis(1000),
            cap: Duration::from_millis(30_000),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay for retry `attempt` (0-indexed): `min(base * 2^attempt, cap)`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.cap)
    }
}

/// Lifecycle of the push connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing requested.
    #[default]
    Idle,
    /// Socket handshake in flight.
    Connecting,
    /// Socket open, events flowing.
    Open,
    /// Closed; a retry is scheduled after `delay`.
    Retrying { attempt: u32, delay: Duration },
    /// Closed; no more retries until the next explicit connect.
    GivenUp,
}

impl LinkState {
    /// True only while events can arrive.
    pub fn is_live(&self) -> bool {
        matches!(self, LinkState::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Idle => "idle",
            LinkState::Connecting => "connecting",
            LinkState::Open => "open",
            LinkState::Retrying { .. } => "retrying",
            LinkState::GivenUp => "given up",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Retrying { attempt, delay } => write!(
                f,
                "retrying in {}ms (attempt {})",
                delay.as_millis(),
                attempt + 1
            ),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// What the caller should do after the socket closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Wait this long, then call [`Reconnector::retry_due`] and reconnect.
    Retry(Duration),
    /// Attempts exhausted.
    GiveUp,
    /// The close arrived in a state where it means nothing (e.g. after an
    /// explicit disconnect).
    Ignored,
}

/// Backoff state machine.
#[derive(Debug, Clone)]
pub struct Reconnector {
    policy: ReconnectPolicy,
    state: LinkState,
    attempts: u32,
}

impl Reconnector {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Reconnector {
            policy,
            state: LinkState::Idle,
            attempts: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Retries started since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Explicit connect. Valid from any state and resets the attempt count,
    /// which is the only way out of [`LinkState::GivenUp`].
    pub fn connect(&mut self) {
        self.attempts = 0;
        self.state = LinkState::Connecting;
    }

    /// The socket finished its handshake.
    pub fn opened(&mut self) {
        if self.state == LinkState::Connecting {
            self.state = LinkState::Open;
            self.attempts = 0;
        }
    }

    /// The socket failed to open, errored, or was closed by the server.
    pub fn closed(&mut self) -> CloseOutcome {
        match self.state {
            LinkState::Connecting | LinkState::Open => {
                if self.attempts >= self.policy.max_attempts {
                    self.state = LinkState::GivenUp;
                    CloseOutcome::GiveUp
                } else {
                    let delay = self.policy.delay(self.attempts);
                    self.state = LinkState::Retrying {
                        attempt: self.attempts,
                        delay,
                    };
                    CloseOutcome::Retry(delay)
                }
            }
            LinkState::Idle | LinkState::Retrying { .. } | LinkState::GivenUp => {
                CloseOutcome::Ignored
            }
        }
    }

    /// The retry delay elapsed. Returns false if no retry was pending.
    pub fn retry_due(&mut self) -> bool {
        if let LinkState::Retrying { .. } = self.state {
            self.attempts += 1;
            self.state = LinkState::Connecting;
            true
        } else {
            false
        }
    }

    /// Explicit disconnect from any state.
    pub fn disconnect(&mut self) {
        self.attempts = 0;
        self.state = LinkState::Idle;
    }
}

#[cfg(test)]
#[path = "reconnect_tests.rs"]
mod tests;
