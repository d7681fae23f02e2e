// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state store.
//!
//! All client state lives in one [`State`] value. It only changes through
//! [`reduce`], a pure `(state, event) -> state` function, and each change
//! swaps in a new `Arc` for the keys it touches while leaving the others
//! pointer-equal. Observers can therefore detect what changed with
//! [`Arc::ptr_eq`].
//!
//! [`Store`] wraps the current state in a `tokio::sync::watch` channel so
//! the view, the push path and the pull path can all dispatch events and
//! subscribe to the result.
//!
//! Ownership of keys:
//! - composer (input buffer and mention menu): the input view
//! - timeline, `reply_pending`: the reconciler (push and pull paths)
//! - `link`: the transport manager
//! - everything else: session lifecycle and directory loads

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::composer::Composer;
use crate::model::{CallHistory, Message, MessageStats, ModeInfo, Participant, Session, SessionMode};
use crate::reconcile;
use crate::reconnect::LinkState;

/// Snapshot of all client state.
#[derive(Debug, Clone)]
pub struct State {
    pub sessions: Arc<Vec<Session>>,
    pub active_session: Option<Arc<Session>>,
    pub timeline: Arc<Vec<Message>>,
    pub participants: Arc<Vec<Participant>>,
    pub composer: Arc<Composer>,
    pub reply_pending: bool,
    pub link: LinkState,
    pub stats: Option<MessageStats>,
    pub call_history: Arc<Vec<CallHistory>>,
    pub modes: Arc<Vec<ModeInfo>>,
    pub session_mode: Option<Arc<SessionMode>>,
    /// Sequence number of the pull that produced `timeline`.
    last_pull: u64,
    /// Highest pull sequence number issued before the last send. Pulls at
    /// or below it cannot contain the sent message.
    reply_barrier: u64,
}

impl Default for State {
    fn default() -> Self {
        State {
            sessions: Arc::new(Vec::new()),
            active_session: None,
            timeline: Arc::new(Vec::new()),
            participants: Arc::new(Vec::new()),
            composer: Arc::new(Composer::new()),
            reply_pending: false,
            link: LinkState::Idle,
            stats: None,
            call_history: Arc::new(Vec::new()),
            modes: Arc::new(Vec::new()),
            session_mode: None,
            last_pull: 0,
            reply_barrier: 0,
        }
    }
}

impl State {
    /// Id of the active session.
    pub fn active_id(&self) -> Option<&str> {
        self.active_session.as_deref().map(|s| s.id.as_str())
    }

    fn is_active(&self, session_id: &str) -> bool {
        self.active_id() == Some(session_id)
    }
}

/// Everything that can change the state.
#[derive(Debug, Clone)]
pub enum Event {
    /// The session list was fetched.
    SessionsLoaded(Vec<Session>),
    /// A session was created; it goes to the top of the list.
    SessionCreated(Session),
    /// A session was renamed or otherwise changed on the server.
    SessionUpdated(Session),
    /// A session was deleted. Deleting the active one deactivates it.
    SessionDeleted(String),
    /// The user switched sessions (or closed the conversation with `None`).
    SessionActivated(Option<Session>),
    /// A message arrived on the push channel.
    MessagePushed(Message),
    /// The server accepted the user's own message.
    MessageSent(Message),
    /// A pull fetch completed.
    TimelinePulled {
        session_id: String,
        seq: u64,
        messages: Vec<Message>,
    },
    ReplyPending(bool),
    ParticipantsLoaded(Vec<Participant>),
    ComposerChanged(Composer),
    LinkChanged(LinkState),
    StatsLoaded {
        session_id: String,
        stats: MessageStats,
    },
    HistoryLoaded {
        session_id: String,
        records: Vec<CallHistory>,
    },
    ModesLoaded(Vec<ModeInfo>),
    SessionModeLoaded {
        session_id: String,
        mode: SessionMode,
    },
}

/// Applies one event. Keys the event does not touch stay pointer-equal.
///
/// A send recorded here only fences off pulls already applied. [`Store`]
/// also fences off pulls still in flight.
pub fn reduce(state: &State, event: Event) -> State {
    apply(state, event, state.last_pull)
}

fn apply(state: &State, event: Event, pulls_issued: u64) -> State {
    let mut next = state.clone();
    match event {
        Event::SessionsLoaded(sessions) => {
            next.sessions = Arc::new(sessions);
        }
        Event::SessionCreated(session) => {
            let mut sessions = Vec::with_capacity(state.sessions.len() + 1);
            sessions.push(session);
            sessions.extend(state.sessions.iter().cloned());
            next.sessions = Arc::new(sessions);
        }
        Event::SessionUpdated(session) => {
            next.sessions = Arc::new(
                state
                    .sessions
                    .iter()
                    .map(|s| {
                        if s.id == session.id {
                            session.clone()
                        } else {
                            s.clone()
                        }
                    })
                    .collect(),
            );
            if state.is_active(&session.id) {
                next.active_session = Some(Arc::new(session));
            }
        }
        Event::SessionDeleted(id) => {
            next.sessions = Arc::new(
                state
                    .sessions
                    .iter()
                    .filter(|s| s.id != id)
                    .cloned()
                    .collect(),
            );
            if state.is_active(&id) {
                next = activate(next, None);
            }
        }
        Event::SessionActivated(session) => {
            next = activate(next, session);
        }
        Event::MessagePushed(message) => {
            if !state.is_active(&message.session_id) {
                debug!(session = %message.session_id, "dropping push for inactive session");
                return next;
            }
            if let Some(timeline) = reconcile::merge_pushed(&state.timeline, &message) {
                next.timeline = Arc::new(timeline);
            }
        }
        Event::MessageSent(message) => {
            if !state.is_active(&message.session_id) {
                return next;
            }
            if let Some(timeline) = reconcile::merge_pushed(&state.timeline, &message) {
                next.timeline = Arc::new(timeline);
            }
            next.reply_pending = true;
            next.reply_barrier = pulls_issued.max(state.last_pull);
        }
        Event::TimelinePulled {
            session_id,
            seq,
            messages,
        } => {
            if !state.is_active(&session_id) || !reconcile::pull_is_fresh(state.last_pull, seq) {
                debug!(session = %session_id, seq, "discarding stale pull");
                return next;
            }
            if seq <= state.reply_barrier {
                debug!(session = %session_id, seq, "discarding pull issued before send");
                return next;
            }
            if state.reply_pending && reconcile::reply_arrived(&messages) {
                next.reply_pending = false;
            }
            next.timeline = Arc::new(messages);
            next.last_pull = seq;
        }
        Event::ReplyPending(pending) => {
            next.reply_pending = pending;
        }
        Event::ParticipantsLoaded(participants) => {
            next.participants = Arc::new(participants);
        }
        Event::ComposerChanged(composer) => {
            next.composer = Arc::new(composer);
        }
        Event::LinkChanged(link) => {
            next.link = link;
        }
        Event::StatsLoaded { session_id, stats } => {
            if state.is_active(&session_id) {
                next.stats = Some(stats);
            }
        }
        Event::HistoryLoaded {
            session_id,
            records,
        } => {
            if state.is_active(&session_id) {
                next.call_history = Arc::new(records);
            }
        }
        Event::ModesLoaded(modes) => {
            next.modes = Arc::new(modes);
        }
        Event::SessionModeLoaded { session_id, mode } => {
            if state.is_active(&session_id) {
                next.session_mode = Some(Arc::new(mode));
            }
        }
    }
    next
}

/// Resets everything scoped to the previous session.
fn activate(mut state: State, session: Option<Session>) -> State {
    state.active_session = session.map(Arc::new);
    state.timeline = Arc::new(Vec::new());
    state.reply_pending = false;
    state.stats = None;
    state.call_history = Arc::new(Vec::new());
    state.session_mode = None;
    state.last_pull = 0;
    state.reply_barrier = 0;
    state
}

/// Observable holder of the current [`State`].
///
/// Cloning a store yields another handle to the same state.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<Arc<State>>>,
    pull_seq: Arc<AtomicU64>,
}

impl Store {
    /// Creates a store holding the empty state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(State::default()));
        Store {
            tx: Arc::new(tx),
            pull_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The current state.
    pub fn state(&self) -> Arc<State> {
        Arc::clone(&self.tx.borrow())
    }

    /// Applies an event and notifies subscribers.
    pub fn dispatch(&self, event: Event) {
        self.tx.send_modify(|state| {
            let issued = self.pull_seq.load(Ordering::SeqCst);
            let next = apply(state, event, issued);
            *state = Arc::new(next);
        });
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<State>> {
        self.tx.subscribe()
    }

    /// Numbers the next pull fetch. Numbers are unique for the store's
    /// lifetime and increase in issue order.
    pub fn next_pull_seq(&self) -> u64 {
        self.pull_seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
