// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Networked half of the cafe chat client.
//!
//! - [`ApiClient`]: REST endpoints for sessions, messages, participants,
//!   call history and modes
//! - [`TransportManager`]: the per-session push link with backoff
//! - [`start_polling`]: the pull path
//! - [`SessionSync`]: both paths wired to the active session
//! - [`CafeClient`]: what a front end drives
//!
//! Everything converges on one [`cafe_core::Store`].

pub mod api;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod poller;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use api::{ApiClient, TimelineSource};
pub use client::CafeClient;
pub use config::ClientConfig;
pub use connection::{Subscription, TransportManager};
pub use error::{ClientError, ClientResult};
pub use poller::{start_polling, PollHandle};
pub use session::SessionSync;
pub use transport::{Transport, TransportError, WebSocketTransport};
