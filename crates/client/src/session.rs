// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Active-session lifecycle.
//!
//! [`SessionSync`] wires one session to both reconciliation paths: push
//! events flow from the transport manager into the store, and a poller
//! re-fetches the timeline. Switching sessions tears the old wiring down
//! completely before the new one starts, so nothing from the previous
//! session can reach the store afterwards.

use std::sync::Arc;

use cafe_core::{Event, LinkState, Message, PollCadence, Session, Store, Submission};
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::connection::{Subscription, TransportManager};
use crate::error::{ClientError, ClientResult};
use crate::poller::{start_polling, PollHandle};
use crate::transport::{Transport, WebSocketTransport};

struct Active {
    session_id: String,
    poller: PollHandle,
    subscriptions: Vec<Subscription>,
}

/// Keeps the store in sync with the active session.
pub struct SessionSync<T: Transport + 'static = WebSocketTransport> {
    store: Store,
    api: Arc<ApiClient>,
    transport: TransportManager<T>,
    cadence: PollCadence,
    active: Option<Active>,
}

impl SessionSync<WebSocketTransport> {
    pub fn new(store: Store, api: Arc<ApiClient>, config: &ClientConfig) -> Self {
        Self::with_transport(store, api, TransportManager::new(config.clone()), config)
    }
}

impl<T: Transport + 'static> SessionSync<T> {
    pub fn with_transport(
        store: Store,
        api: Arc<ApiClient>,
        transport: TransportManager<T>,
        config: &ClientConfig,
    ) -> Self {
        SessionSync {
            store,
            api,
            transport,
            cadence: config.poll_cadence(),
            active: None,
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.session_id.as_str())
    }

    /// True while push events are flowing.
    pub fn is_live(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn link_state(&self) -> LinkState {
        self.transport.state()
    }

    /// Makes `session` the active session.
    ///
    /// Re-activating the active session refreshes its record and reopens a
    /// push link that gave up. Details (mode, stats, history) that fail to
    /// load are logged and left empty.
    pub async fn activate(&mut self, session: Session) -> ClientResult<()> {
        if self.active_id() == Some(session.id.as_str()) {
            self.store.dispatch(Event::SessionUpdated(session));
            self.reconnect().await;
            return Ok(());
        }
        self.teardown().await;

        let session_id = session.id.clone();
        info!(session_id = %session_id, "activating session");
        self.store.dispatch(Event::SessionActivated(Some(session)));

        let subscriptions = self.subscribe(&session_id);
        if let Err(e) = self.transport.connect(&session_id).await {
            warn!(session_id = %session_id, error = %e, "push link unavailable; polling only");
        }
        let poller = start_polling(
            Arc::clone(&self.api),
            self.store.clone(),
            session_id.clone(),
            self.cadence,
        );
        self.active = Some(Active {
            session_id: session_id.clone(),
            poller,
            subscriptions,
        });

        self.load_details(&session_id).await;
        Ok(())
    }

    /// Closes the active session, if any.
    pub async fn deactivate(&mut self) {
        if self.active.is_some() {
            self.teardown().await;
            self.store.dispatch(Event::SessionActivated(None));
        }
    }

    /// Posts a submission to the active session.
    ///
    /// The returned message is merged into the timeline and the pull path
    /// switches to its faster cadence until a reply arrives.
    pub async fn send(&self, submission: &Submission) -> ClientResult<Message> {
        let session_id = self.active_id().ok_or(ClientError::NoActiveSession)?;
        if submission.content.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        let message = self
            .api
            .send_message(session_id, &submission.content, &submission.mentions)
            .await?;
        debug!(id = %message.id, mentions = submission.mentions.len(), "message sent");
        self.store.dispatch(Event::MessageSent(message.clone()));
        Ok(message)
    }

    /// Starts a fresh push link for the active session unless one is
    /// already running. This is the only way out of [`LinkState::GivenUp`].
    pub async fn reconnect(&mut self) {
        let Some(session_id) = self.active_id().map(str::to_string) else {
            return;
        };
        if let Err(e) = self.transport.connect(&session_id).await {
            warn!(session_id = %session_id, error = %e, "push link unavailable; polling only");
        }
    }

    /// Re-fetches mode, stats and call history of the active session.
    pub async fn refresh(&self) {
        if let Some(session_id) = self.active_id() {
            self.load_details(session_id).await;
        }
    }

    fn subscribe(&self, session_id: &str) -> Vec<Subscription> {
        let on_message = {
            let store = self.store.clone();
            self.transport
                .on_message(move |message| store.dispatch(Event::MessagePushed(message)))
        };
        let on_history = {
            let store = self.store.clone();
            let session_id = session_id.to_string();
            self.transport.on_history(move |records| {
                store.dispatch(Event::HistoryLoaded {
                    session_id: session_id.clone(),
                    records,
                })
            })
        };
        let on_link = {
            let store = self.store.clone();
            self.transport
                .on_link(move |link| store.dispatch(Event::LinkChanged(link)))
        };
        vec![on_message, on_history, on_link]
    }

    async fn load_details(&self, session_id: &str) {
        let (mode, stats, history) = tokio::join!(
            self.api.session_mode(session_id),
            self.api.message_stats(session_id),
            self.api.call_history(session_id),
        );
        match mode {
            Ok(mode) => self.store.dispatch(Event::SessionModeLoaded {
                session_id: session_id.to_string(),
                mode,
            }),
            Err(e) => warn!(session_id, error = %e, "failed to load session mode"),
        }
        match stats {
            Ok(stats) => self.store.dispatch(Event::StatsLoaded {
                session_id: session_id.to_string(),
                stats,
            }),
            Err(e) => warn!(session_id, error = %e, "failed to load message stats"),
        }
        match history {
            Ok(records) => self.store.dispatch(Event::HistoryLoaded {
                session_id: session_id.to_string(),
                records,
            }),
            Err(e) => warn!(session_id, error = %e, "failed to load call history"),
        }
    }

    async fn teardown(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        debug!(session_id = %active.session_id, "tearing down session");
        active.poller.stop().await;
        active.subscriptions.clear();
        self.transport.disconnect().await;
        self.store.dispatch(Event::LinkChanged(LinkState::Idle));
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
