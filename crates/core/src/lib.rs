// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! cafe-core: Synchronization core for the cafe chat client
//!
//! This crate holds the pure parts of the client: the data model, push
//! envelope decoding, mention detection and resolution, the reconnection
//! state machine, timeline reconciliation rules and the shared state store.
//! Nothing here performs network I/O; `cafe-client` drives it.

pub mod composer;
pub mod error;
pub mod history;
pub mod mention;
pub mod model;
pub mod protocol;
pub mod reconcile;
pub mod reconnect;
pub mod store;

pub use composer::{Composer, Key, KeyOutcome, MentionMenu, Submission};
pub use error::{Error, Result};
pub use history::{HistoryDisplay, HistoryGroup};
pub use mention::MentionQuery;
pub use model::{
    CallHistory, Message, MessageKind, MessageStats, ModeConfig, ModeInfo, ModeState,
    Participant, ParticipantStatus, Sender, Session, SessionMode,
};
pub use protocol::{Envelope, PushEvent};
pub use reconcile::PollCadence;
pub use reconnect::{CloseOutcome, LinkState, ReconnectPolicy, Reconnector};
pub use store::{Event, State, Store};
